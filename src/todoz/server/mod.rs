//! # Server Mode
//!
//! `todoz serve` keeps running and drives three concurrent paths against one
//! shared store:
//!
//! - the **notifier** loop, which wakes up every tick and runs the configured
//!   notification command for each due entry ([`notifier`]);
//! - the optional **REST API** ([`rest`]);
//! - a **signal** task: `SIGHUP` reloads the configuration, Ctrl-C and
//!   `SIGTERM` shut everything down.
//!
//! ## Reload
//!
//! Configuration and the store built from it live together in one
//! [`Runtime`], published through an [`AppHandle`]. Every operation grabs the
//! current `Arc<Runtime>` once and works with it until done. A reload builds a
//! fresh runtime and swaps the pointer: new operations see the new store,
//! operations already running finish against the old one.
//!
//! Store calls are blocking file I/O and go through
//! [`tokio::task::spawn_blocking`].

use crate::api::TodoApi;
use crate::config::TodoConfig;
use crate::error::{Result, TodoError};
use crate::store::fs::FileStore;
use crate::store::guarded::GuardedStore;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub mod notifier;
pub mod rest;

pub type ServerApi = TodoApi<GuardedStore<FileStore>>;

/// One generation of configuration plus the facade built from it.
pub struct Runtime {
    pub config: TodoConfig,
    pub api: ServerApi,
    pub version: u64,
}

impl Runtime {
    fn build(home: &Path, config: TodoConfig, version: u64) -> Self {
        let store = GuardedStore::new(config.open_store(home));
        debug!(version, dir = %config.entries_dir(home).display(), "built runtime");
        Self {
            config,
            api: TodoApi::new(store),
            version,
        }
    }
}

#[derive(Clone)]
pub struct AppHandle {
    home: PathBuf,
    current: Arc<RwLock<Arc<Runtime>>>,
}

impl AppHandle {
    pub fn new(home: PathBuf, config: TodoConfig) -> Self {
        let runtime = Runtime::build(&home, config, 0);
        Self {
            home,
            current: Arc::new(RwLock::new(Arc::new(runtime))),
        }
    }

    /// Reads the configuration from `home`, falling back to defaults.
    pub fn load(home: PathBuf) -> Self {
        let config = TodoConfig::load_or_default(&home);
        Self::new(home, config)
    }

    pub fn current(&self) -> Arc<Runtime> {
        self.current.read().clone()
    }

    /// Re-reads the configuration and publishes a new runtime.
    pub fn reload(&self) -> Arc<Runtime> {
        let config = TodoConfig::load_or_default(&self.home);
        let mut current = self.current.write();
        let next = Arc::new(Runtime::build(&self.home, config, current.version + 1));
        *current = Arc::clone(&next);
        info!(version = next.version, "configuration reloaded");
        next
    }

    /// Runs `f` against the current facade on the blocking thread pool.
    pub async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ServerApi) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let runtime = self.current();
        tokio::task::spawn_blocking(move || f(&runtime.api))
            .await
            .map_err(|e| TodoError::Store(format!("store task failed: {}", e)))?
    }
}

/// Runs the server until cancelled by a signal or by `cancel`.
pub async fn run(handle: AppHandle, with_rest: bool, cancel: CancellationToken) -> anyhow::Result<()> {
    let signals = tokio::spawn(handle_signals(handle.clone(), cancel.clone()));

    let rest = if with_rest {
        Some(tokio::spawn(rest::serve(handle.clone(), cancel.clone())))
    } else {
        None
    };

    notifier::run_loop(handle, cancel.clone()).await;
    cancel.cancel();

    if let Some(rest) = rest {
        rest.await??;
    }
    signals.await??;
    info!("server stopped");
    Ok(())
}

#[cfg(unix)]
async fn handle_signals(handle: AppHandle, cancel: CancellationToken) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = hangup.recv() => {
                handle.reload();
            }
            _ = terminate.recv() => {
                info!("Received terminate signal, shutting down");
                cancel.cancel();
                break;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C signal, shutting down");
                cancel.cancel();
                break;
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn handle_signals(_handle: AppHandle, cancel: CancellationToken) -> anyhow::Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received Ctrl+C signal, shutting down");
            cancel.cancel();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntryStore;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn reload_swaps_to_new_store() {
        let home = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let handle = AppHandle::new(home.path().to_path_buf(), TodoConfig::default());

        let before = handle.current();
        before.api.add("In home", String::new(), None).unwrap();

        let config = TodoConfig {
            todo_dir: Some(other.path().to_path_buf()),
            ..TodoConfig::default()
        };
        config.save(home.path()).unwrap();
        let after = handle.reload();

        assert_eq!(after.version, before.version + 1);
        assert_eq!(handle.current().version, after.version);
        assert!(after.api.list_all().unwrap().listed_entries.is_empty());

        // the captured runtime still sees the old directory
        assert_eq!(before.api.store().list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blocking_runs_against_current_runtime() {
        let home = TempDir::new().unwrap();
        let handle = AppHandle::new(home.path().to_path_buf(), TodoConfig::default());

        handle
            .blocking(|api| api.add("Async", String::new(), None))
            .await
            .unwrap();
        let listed = handle.blocking(|api| api.list_all()).await.unwrap();
        assert_eq!(listed.listed_entries.len(), 1);
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let home = TempDir::new().unwrap();
        let handle = AppHandle::new(home.path().to_path_buf(), TodoConfig::default());
        let cancel = CancellationToken::new();

        let server = tokio::spawn(run(handle, false, cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
