// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::watch::filter::{relative_str, WatchFilter};

/// One relevant filesystem change, already filtered and relativized.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the given directories recursively and forward relevant changes.
///
/// `root` is the project root against which changed paths are relativized
/// before `filter` sees them, so `[watch].exclude` globs match root-relative
/// paths (`src/scratch.swp`, not `scratch.swp`); `roots` are the directories
/// actually watched. Access-only events are dropped; `notify` emits no
/// synthetic events for pre-existing files, so there is no startup burst to
/// suppress.
pub fn spawn_watcher(
    root: &Path,
    roots: &[PathBuf],
    filter: WatchFilter,
) -> Result<(WatcherHandle, mpsc::UnboundedReceiver<ChangeEvent>)> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let roots: Vec<PathBuf> = roots
        .iter()
        .map(|r| r.canonicalize().unwrap_or_else(|_| r.clone()))
        .collect();

    let (change_tx, change_rx) = mpsc::unbounded_channel::<ChangeEvent>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(change) = relevant_change(&root, &filter, &event) {
                    // The loop may have exited already; nothing to do then.
                    let _ = change_tx.send(change);
                }
            }
            Err(err) => {
                // tracing is not reliably usable from notify's thread.
                eprintln!("deckbake: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    for root in &roots {
        match watcher.watch(root, RecursiveMode::Recursive) {
            Ok(()) => info!("watching {:?}", root),
            Err(err) => warn!("could not watch {:?}: {err}", root),
        }
    }

    Ok((WatcherHandle { _inner: watcher }, change_rx))
}

fn relevant_change(root: &Path, filter: &WatchFilter, event: &Event) -> Option<ChangeEvent> {
    if matches!(event.kind, EventKind::Access(_)) {
        return None;
    }

    for path in &event.paths {
        if let Some(rel) = relative_str(root, path) {
            if filter.is_relevant(&rel) {
                debug!(path = %rel, kind = ?event.kind, "relevant change");
                return Some(ChangeEvent { path: path.clone() });
            }
        }
    }

    None
}
