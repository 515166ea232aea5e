//! Project Watch Registry
//!
//! Tracks one filesystem watch session per project directory using the
//! `notify` crate. Raw events for the planning-state and tracking-database
//! subdirectories are debounced per file path and confirmed stable before a
//! single callback fires.

use notify::event::{CreateKind, RemoveKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::events::FileEventKind;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{planning_dir, tracking_dir};

/// Default quiet period before a changed path is considered settled
const DEFAULT_QUIET_PERIOD_MS: u64 = 300;

/// Default interval for the stability confirmation poll
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Configuration for the watch registry
///
/// The defaults are heuristics, not correctness bounds: a write that keeps a
/// file growing across the quiet period can still settle early. Callers with
/// slower producers should raise the quiet period.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Quiet period a path must go without raw events before settling
    pub quiet_period_ms: u64,
    /// Interval between size checks when confirming stability
    pub poll_interval_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Callback invoked once per stable file event
pub type StableEventCallback = Arc<dyn Fn(FileEventKind, PathBuf) + Send + Sync>;

/// A change waiting out its quiet period
struct PendingChange {
    /// Whether the burst contained a creation event
    saw_create: bool,
    /// Generation of the timer that owns this entry
    generation: u64,
    /// Settle timer; aborted when a newer raw event resets the path
    timer: JoinHandle<()>,
}

/// State shared between a session's dispatch task and its settle timers
struct SessionShared {
    callback: StableEventCallback,
    config: WatcherConfig,
    cancel: CancellationToken,
    next_generation: AtomicU64,
    pending: Mutex<HashMap<PathBuf, PendingChange>>,
}

impl SessionShared {
    fn lock_pending(&self) -> MutexGuard<'_, HashMap<PathBuf, PendingChange>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// One active watch subscription for a project
struct WatchSession {
    /// Owned OS subscription; dropping it releases the watch handles
    _watcher: RecommendedWatcher,
    /// The two monitored subdirectories under the project path
    watched_roots: [PathBuf; 2],
    shared: Arc<SessionShared>,
    dispatch: JoinHandle<()>,
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
        self.dispatch.abort();
        let mut pending = self.shared.lock_pending();
        for (_, change) in pending.drain() {
            change.timer.abort();
        }
    }
}

/// Registry state, keyed by project path
struct WatcherState {
    sessions: HashMap<PathBuf, WatchSession>,
}

impl WatcherState {
    fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }
}

/// Project Watch Registry
///
/// Maps each project path to at most one watch session. Sessions deliver
/// debounced add/change/unlink callbacks for files under the project's
/// planning-state and tracking-database subdirectories.
pub struct WatchRegistry {
    state: Arc<RwLock<WatcherState>>,
    config: WatcherConfig,
}

impl WatchRegistry {
    /// Create a new registry with default timing
    pub fn new() -> Self {
        Self::with_config(WatcherConfig::default())
    }

    /// Create a registry with custom timing
    pub fn with_config(config: WatcherConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(WatcherState::new())),
            config,
        }
    }

    /// Start watching a project directory.
    ///
    /// Idempotent: a second call for the same path is a no-op and does not
    /// replace the callback. The watched subdirectories need not exist yet;
    /// events begin flowing once they are created. Fails only when the
    /// project directory itself is missing or the OS subscription cannot be
    /// opened, in which case nothing is registered.
    pub async fn start<F>(&self, project_path: impl Into<PathBuf>, callback: F) -> AppResult<()>
    where
        F: Fn(FileEventKind, PathBuf) + Send + Sync + 'static,
    {
        let project_path = project_path.into();
        if !project_path.is_dir() {
            return Err(AppError::not_found(format!(
                "Project directory not found: {:?}",
                project_path
            )));
        }
        // Canonical keys keep lookups consistent with the paths the OS
        // facility reports back (tempdirs and symlinked roots differ).
        let project_path = project_path.canonicalize()?;

        let mut state = self.state.write().await;
        if state.sessions.contains_key(&project_path) {
            debug!(path = %project_path.display(), "already watching, start ignored");
            return Ok(());
        }

        let watched_roots = [planning_dir(&project_path), tracking_dir(&project_path)];
        let shared = Arc::new(SessionShared {
            callback: Arc::new(callback),
            config: self.config.clone(),
            cancel: CancellationToken::new(),
            next_generation: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        });

        // Raw events cross from the notify thread into the runtime here.
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |result: Result<notify::Event, notify::Error>| {
                let _ = raw_tx.send(result);
            })
            .map_err(|e| AppError::watch(format!("Failed to create watcher: {}", e)))?;

        // The subscription is rooted at the project so that not-yet-existing
        // subdirectories begin reporting once created; events are filtered
        // to the watched roots in the dispatch task.
        watcher
            .watch(&project_path, RecursiveMode::Recursive)
            .map_err(|e| {
                AppError::watch(format!("Failed to watch {:?}: {}", project_path, e))
            })?;

        let dispatch = tokio::spawn(Self::dispatch_events(
            raw_rx,
            Arc::clone(&shared),
            watched_roots.clone(),
            Arc::clone(&self.state),
            project_path.clone(),
        ));

        state.sessions.insert(
            project_path.clone(),
            WatchSession {
                _watcher: watcher,
                watched_roots,
                shared,
                dispatch,
            },
        );
        debug!(path = %project_path.display(), "watch session started");

        Ok(())
    }

    /// Stop watching a project directory.
    ///
    /// No-op for unknown paths. Pending settle timers are cancelled before
    /// this returns, so no callback for this project fires afterwards.
    pub async fn stop(&self, project_path: &Path) {
        let key = Self::session_key(project_path);
        let removed = {
            let mut state = self.state.write().await;
            state.sessions.remove(&key)
        };
        if removed.is_some() {
            debug!(path = %key.display(), "watch session stopped");
        }
    }

    /// Stop every active session, leaving the registry empty
    pub async fn stop_all(&self) {
        let mut state = self.state.write().await;
        let count = state.sessions.len();
        state.sessions.clear();
        if count > 0 {
            debug!(count, "all watch sessions stopped");
        }
    }

    /// Check whether a project is currently being watched
    pub async fn is_watching(&self, project_path: &Path) -> bool {
        let state = self.state.read().await;
        state.sessions.contains_key(&Self::session_key(project_path))
    }

    /// Get the list of currently watched project paths
    pub async fn watched_projects(&self) -> Vec<PathBuf> {
        let state = self.state.read().await;
        state.sessions.keys().cloned().collect()
    }

    /// Get the monitored subdirectories for a watched project
    pub async fn watched_roots(&self, project_path: &Path) -> Option<Vec<PathBuf>> {
        let state = self.state.read().await;
        state
            .sessions
            .get(&Self::session_key(project_path))
            .map(|s| s.watched_roots.to_vec())
    }

    /// Canonical registry key for a project path, falling back to the path
    /// as given when it no longer resolves
    fn session_key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Route raw notify events into per-path settle timers
    async fn dispatch_events(
        mut raw_rx: mpsc::UnboundedReceiver<Result<notify::Event, notify::Error>>,
        shared: Arc<SessionShared>,
        roots: [PathBuf; 2],
        registry: Arc<RwLock<WatcherState>>,
        project_path: PathBuf,
    ) {
        loop {
            let result = tokio::select! {
                _ = shared.cancel.cancelled() => return,
                received = raw_rx.recv() => match received {
                    Some(result) => result,
                    None => return,
                },
            };

            match result {
                Ok(event) => {
                    match event.kind {
                        // Reads and directory create/remove are not reported
                        EventKind::Access(_)
                        | EventKind::Create(CreateKind::Folder)
                        | EventKind::Remove(RemoveKind::Folder) => continue,
                        _ => {}
                    }
                    let is_create = matches!(event.kind, EventKind::Create(_));
                    for path in event.paths {
                        let under_roots =
                            roots.iter().any(|root| path.starts_with(root) && path != *root);
                        if under_roots {
                            Self::schedule_settle(&shared, path, is_create);
                        }
                    }
                }
                Err(error) => {
                    // Subscription failure after establishment: tear the
                    // session down as an implicit stop.
                    warn!(
                        path = %project_path.display(),
                        %error,
                        "watch subscription failed, stopping session"
                    );
                    shared.cancel.cancel();
                    let mut state = registry.write().await;
                    state.sessions.remove(&project_path);
                    return;
                }
            }
        }
    }

    /// Reset the settle timer for a path, preserving burst bookkeeping
    fn schedule_settle(shared: &Arc<SessionShared>, path: PathBuf, is_create: bool) {
        let generation = shared.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut pending = shared.lock_pending();

        let saw_create = is_create
            || pending
                .get(&path)
                .map(|change| change.saw_create)
                .unwrap_or(false);

        if let Some(previous) = pending.remove(&path) {
            previous.timer.abort();
        }

        let timer = tokio::spawn(Self::settle_and_emit(
            Arc::clone(shared),
            path.clone(),
            generation,
        ));
        pending.insert(
            path,
            PendingChange {
                saw_create,
                generation,
                timer,
            },
        );
    }

    /// Wait out the quiet period, confirm stability, then emit one event
    async fn settle_and_emit(shared: Arc<SessionShared>, path: PathBuf, generation: u64) {
        let quiet = Duration::from_millis(shared.config.quiet_period_ms);
        let poll = Duration::from_millis(shared.config.poll_interval_ms);

        tokio::select! {
            _ = shared.cancel.cancelled() => return,
            _ = tokio::time::sleep(quiet) => {}
        }

        // Stability confirmation: poll until two consecutive size
        // observations agree. A missing file settles immediately.
        let mut observed = Self::observe(&path).await;
        while observed.is_some() {
            tokio::select! {
                _ = shared.cancel.cancelled() => return,
                _ = tokio::time::sleep(poll) => {}
            }
            let next = Self::observe(&path).await;
            if next == observed {
                break;
            }
            observed = next;
        }

        // The pending lock is held through the callback: teardown drains
        // this map under the same lock, so once stop has returned no
        // invocation can still be in flight.
        let mut pending = shared.lock_pending();
        let superseded = pending
            .get(&path)
            .map(|change| change.generation != generation);
        let saw_create = match superseded {
            // Already settled, or a newer raw event re-armed the timer
            None | Some(true) => return,
            Some(false) => pending.remove(&path).map(|c| c.saw_create).unwrap_or(false),
        };

        if shared.cancel.is_cancelled() {
            return;
        }

        let kind = match observed {
            None => FileEventKind::Unlink,
            // Directories themselves are not reported
            Some((true, _)) => return,
            Some((false, _)) if saw_create => FileEventKind::Add,
            Some(_) => FileEventKind::Change,
        };

        debug!(path = %path.display(), %kind, "stable file event");
        (shared.callback)(kind, path);
    }

    /// Observe a path as (is_dir, size), or None when it does not exist
    async fn observe(path: &Path) -> Option<(bool, u64)> {
        tokio::fs::metadata(path)
            .await
            .ok()
            .map(|meta| (meta.is_dir(), meta.len()))
    }
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
