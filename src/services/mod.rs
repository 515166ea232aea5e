//! Services
//!
//! Business logic services: the project watch registry, activity analytics,
//! and the command guard.

pub mod analytics;
pub mod guardrail;
pub mod sync;

pub use analytics::ActivityService;
pub use guardrail::{CommandGuard, GuardDecision, GuardRule, GuardVerdict};
pub use sync::{FileEventKind, StableFileEvent, WatchRegistry, WatcherConfig};
