//! Plan Sentinel
//!
//! Operational backend for planning workspaces:
//! - A watch registry tracking one debounced filesystem watcher per project
//! - Activity analytics over a SQLite store
//! - A command guard that pattern-matches shell invocations

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::activity::{
    ActivityRecord, ActivitySummary, AggregationPeriod, ProjectActivity, TimeSeriesPoint,
    TimeWindow,
};
pub use services::analytics::ActivityService;
pub use services::guardrail::{CommandGuard, GuardDecision, GuardRule, GuardVerdict};
pub use services::sync::{FileEventKind, StableFileEvent, WatchRegistry, WatcherConfig};
pub use state::AppState;
pub use storage::Database;
pub use utils::error::{AppError, AppResult};
