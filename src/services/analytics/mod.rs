//! Activity Analytics
//!
//! Read-only aggregate reporting over the activity store.

pub mod service;

pub use service::*;
