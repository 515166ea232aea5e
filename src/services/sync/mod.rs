//! File System Sync Service
//!
//! Real-time watching of project planning directories.
//! Uses the `notify` crate for cross-platform file system event monitoring.
//!
//! Features:
//! - One watch session per project directory
//! - Debounced event delivery with stability confirmation
//! - Idempotent start/stop, leak-free bulk shutdown

mod events;
mod watcher;

pub use events::*;
pub use watcher::*;
