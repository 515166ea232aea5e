//! Activity Analytics Service
//!
//! SQLite-backed store of stable file change events with the three
//! read-only aggregate endpoints exposed to the reporting layer.
//! Provides schema initialization and connection pooling.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::activity::{
    ActivityRecord, ActivitySummary, AggregationPeriod, ProjectActivity, TimeSeriesPoint,
    TimeWindow,
};
use crate::utils::error::{AppError, AppResult};

/// Type alias for the activity connection pool
pub type ActivityPool = Pool<SqliteConnectionManager>;

/// Analytics service over the activity store
pub struct ActivityService {
    pool: ActivityPool,
}

impl ActivityService {
    /// Create an activity service from an existing database pool
    pub fn from_pool(pool: ActivityPool) -> AppResult<Self> {
        let service = Self { pool };
        service.init_schema()?;
        Ok(service)
    }

    /// Initialize the activity database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS activity_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id TEXT NOT NULL,
                file_path TEXT NOT NULL,
                change_kind TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_activity_records_timestamp
             ON activity_records(timestamp)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_activity_records_project
             ON activity_records(project_id)",
            [],
        )?;

        Ok(())
    }

    /// Get a connection from the pool
    fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Insert a new activity record, returning its row ID
    pub fn record_change(&self, record: &ActivityRecord) -> AppResult<i64> {
        let conn = self.get_connection()?;

        conn.execute(
            "INSERT INTO activity_records (project_id, file_path, change_kind, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.project_id,
                record.file_path,
                record.change_kind,
                record.timestamp,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    // ========================================================================
    // Aggregate Endpoints
    // ========================================================================

    /// Overall activity counts for a time window
    pub fn activity_summary(&self, window: &TimeWindow) -> AppResult<ActivitySummary> {
        let conn = self.get_connection()?;

        let mut sql = String::from(
            "SELECT COUNT(*),
                    COALESCE(SUM(change_kind = 'add'), 0),
                    COALESCE(SUM(change_kind = 'change'), 0),
                    COALESCE(SUM(change_kind = 'unlink'), 0),
                    COUNT(DISTINCT project_id),
                    COUNT(DISTINCT file_path)
             FROM activity_records WHERE 1=1",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        Self::append_window_clauses(&mut sql, &mut params_vec, window);

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let summary = conn.query_row(&sql, params_refs.as_slice(), |row| {
            Ok(ActivitySummary {
                total_events: row.get(0)?,
                add_count: row.get(1)?,
                change_count: row.get(2)?,
                unlink_count: row.get(3)?,
                distinct_projects: row.get(4)?,
                distinct_files: row.get(5)?,
            })
        })?;

        Ok(summary)
    }

    /// Activity aggregated by project for a time window, busiest first
    pub fn activity_by_project(&self, window: &TimeWindow) -> AppResult<Vec<ProjectActivity>> {
        let conn = self.get_connection()?;

        let mut sql = String::from(
            "SELECT project_id,
                    COUNT(*) as total_events,
                    COALESCE(SUM(change_kind = 'add'), 0),
                    COALESCE(SUM(change_kind = 'change'), 0),
                    COALESCE(SUM(change_kind = 'unlink'), 0),
                    MAX(timestamp)
             FROM activity_records WHERE 1=1",
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        Self::append_window_clauses(&mut sql, &mut params_vec, window);

        sql.push_str(" GROUP BY project_id ORDER BY total_events DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let results = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(ProjectActivity {
                    project_id: row.get(0)?,
                    total_events: row.get(1)?,
                    add_count: row.get(2)?,
                    change_count: row.get(3)?,
                    unlink_count: row.get(4)?,
                    last_event_at: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(results)
    }

    /// Bucketed event counts for a time window, ascending
    pub fn activity_timeline(
        &self,
        window: &TimeWindow,
        period: AggregationPeriod,
    ) -> AppResult<Vec<TimeSeriesPoint>> {
        let conn = self.get_connection()?;

        let mut sql = format!(
            "SELECT strftime('{}', datetime(timestamp, 'unixepoch')) as bucket,
                    MIN(timestamp) as bucket_start,
                    COUNT(*)
             FROM activity_records WHERE 1=1",
            period.sql_format()
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        Self::append_window_clauses(&mut sql, &mut params_vec, window);

        sql.push_str(" GROUP BY bucket ORDER BY bucket_start ASC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let results = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(TimeSeriesPoint {
                    timestamp_formatted: row.get(0)?,
                    timestamp: row.get(1)?,
                    event_count: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(results)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Append time-window clauses to a query
    fn append_window_clauses(
        sql: &mut String,
        params: &mut Vec<Box<dyn rusqlite::ToSql>>,
        window: &TimeWindow,
    ) {
        if let Some(start) = window.start {
            sql.push_str(" AND timestamp >= ?");
            params.push(Box::new(start));
        }
        if let Some(end) = window.end {
            sql.push_str(" AND timestamp < ?");
            params.push(Box::new(end));
        }
    }

    /// Check if the service is healthy
    pub fn is_healthy(&self) -> bool {
        if let Ok(conn) = self.pool.get() {
            conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
        } else {
            false
        }
    }
}

impl std::fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityService")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}
