//! Integration Tests Module
//!
//! End-to-end coverage for the watch registry lifecycle and debounce
//! behavior, the activity analytics endpoints, and the command guard.


// Activity analytics endpoint tests
mod analytics_test;

// Command guard tests
mod guardrail_test;
