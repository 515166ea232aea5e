//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.plan-sentinel/ and the per-project watched subdirectories.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Name of the planning-state subdirectory watched inside each project
pub const PLANNING_DIR_NAME: &str = ".planning";

/// Name of the tracking-database subdirectory watched inside each project
pub const TRACKING_DIR_NAME: &str = ".todos";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Plan Sentinel directory (~/.plan-sentinel/)
pub fn plan_sentinel_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".plan-sentinel"))
}

/// Get the activity database file path (~/.plan-sentinel/activity.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(plan_sentinel_dir()?.join("activity.db"))
}

/// Get the planning-state directory for a project
pub fn planning_dir(project_path: &Path) -> PathBuf {
    project_path.join(PLANNING_DIR_NAME)
}

/// Get the tracking-database directory for a project
pub fn tracking_dir(project_path: &Path) -> PathBuf {
    project_path.join(TRACKING_DIR_NAME)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Plan Sentinel directory, creating if it doesn't exist
pub fn ensure_plan_sentinel_dir() -> AppResult<PathBuf> {
    let path = plan_sentinel_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
