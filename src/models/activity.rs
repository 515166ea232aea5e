//! Activity Models
//!
//! Data structures for project activity analytics.

use serde::{Deserialize, Serialize};

/// A single activity record tracking one stable file change in a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique record identifier
    pub id: i64,
    /// Project the change belongs to
    pub project_id: String,
    /// Full path of the changed file
    pub file_path: String,
    /// Kind of change ("add", "change", "unlink")
    pub change_kind: String,
    /// Unix timestamp of the record
    pub timestamp: i64,
}

impl ActivityRecord {
    /// Create a new activity record stamped with the current time
    pub fn new(
        project_id: impl Into<String>,
        file_path: impl Into<String>,
        change_kind: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            project_id: project_id.into(),
            file_path: file_path.into(),
            change_kind: change_kind.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Set an explicit timestamp
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Time window for analytics queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeWindow {
    /// Start timestamp (Unix epoch, inclusive)
    pub start: Option<i64>,
    /// End timestamp (Unix epoch, exclusive)
    pub end: Option<i64>,
}

impl TimeWindow {
    /// Create a window covering the last N hours
    pub fn last_hours(hours: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            start: Some(now - hours * 60 * 60),
            end: None,
        }
    }

    /// Create a window covering the last N days
    pub fn last_days(days: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            start: Some(now - days * 24 * 60 * 60),
            end: None,
        }
    }

    /// Create a bounded window
    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Aggregated activity counts over a window
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActivitySummary {
    /// Total number of events
    pub total_events: i64,
    /// Number of file additions
    pub add_count: i64,
    /// Number of file modifications
    pub change_count: i64,
    /// Number of file removals
    pub unlink_count: i64,
    /// Number of distinct projects with activity
    pub distinct_projects: i64,
    /// Number of distinct files touched
    pub distinct_files: i64,
}

/// Activity aggregated by project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectActivity {
    /// Project ID
    pub project_id: String,
    /// Total number of events for this project
    pub total_events: i64,
    /// Number of file additions
    pub add_count: i64,
    /// Number of file modifications
    pub change_count: i64,
    /// Number of file removals
    pub unlink_count: i64,
    /// Timestamp of the most recent event
    pub last_event_at: i64,
}

/// Time-series data point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Timestamp of the first event in the bucket (Unix epoch)
    pub timestamp: i64,
    /// Formatted bucket label for display
    pub timestamp_formatted: String,
    /// Number of events in this bucket
    pub event_count: i64,
}

/// Aggregation period for time-series data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl AggregationPeriod {
    /// Get SQL date format string for SQLite strftime
    pub fn sql_format(&self) -> &'static str {
        match self {
            AggregationPeriod::Hourly => "%Y-%m-%d %H:00:00",
            AggregationPeriod::Daily => "%Y-%m-%d",
            AggregationPeriod::Weekly => "%Y-%W",
            AggregationPeriod::Monthly => "%Y-%m",
        }
    }
}
