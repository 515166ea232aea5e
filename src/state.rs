//! Application State
//!
//! Owns all services and wires the watch registry into the activity store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::models::activity::ActivityRecord;
use crate::services::analytics::ActivityService;
use crate::services::guardrail::CommandGuard;
use crate::services::sync::{StableFileEvent, WatchRegistry, WatcherConfig};
use crate::storage::Database;
use crate::utils::error::AppResult;

/// Application state owning the watch registry, activity store, and guard.
///
/// Constructed explicitly and passed to the surrounding application's
/// service layer; there is no implicit global.
pub struct AppState {
    registry: WatchRegistry,
    activity: Arc<ActivityService>,
    guard: CommandGuard,
}

impl AppState {
    /// Create app state backed by the given database
    pub fn new(database: &Database) -> AppResult<Self> {
        Self::with_watcher_config(database, WatcherConfig::default())
    }

    /// Create app state with custom watcher timing
    pub fn with_watcher_config(database: &Database, config: WatcherConfig) -> AppResult<Self> {
        Ok(Self {
            registry: WatchRegistry::with_config(config),
            activity: Arc::new(ActivityService::from_pool(database.pool())?),
            guard: CommandGuard::new(),
        })
    }

    /// Start watching a project, recording each stable event as activity
    pub async fn watch_project(&self, project_path: impl Into<PathBuf>) -> AppResult<()> {
        let project_path = project_path.into();
        let activity = Arc::clone(&self.activity);
        let callback_root = project_path.clone();

        self.registry
            .start(project_path, move |kind, path| {
                let event = StableFileEvent::new(kind, &path, &callback_root);
                let project_id = event
                    .project_id
                    .clone()
                    .unwrap_or_else(|| callback_root.to_string_lossy().to_string());
                let record = ActivityRecord::new(project_id, event.path.clone(), kind.as_str());
                if let Err(error) = activity.record_change(&record) {
                    warn!(path = %event.path, %error, "failed to record activity");
                }
            })
            .await
    }

    /// Stop watching a project
    pub async fn unwatch_project(&self, project_path: &Path) {
        self.registry.stop(project_path).await;
    }

    /// Stop all watch sessions; call during process shutdown
    pub async fn shutdown(&self) {
        self.registry.stop_all().await;
    }

    /// The watch registry
    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// The activity analytics service
    pub fn activity(&self) -> &ActivityService {
        &self.activity
    }

    /// The command guard
    pub fn guard(&self) -> &CommandGuard {
        &self.guard
    }
}
