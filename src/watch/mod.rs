// src/watch/mod.rs

//! Watch-and-rebuild mode.
//!
//! This module turns filesystem change events into serialized rebuilds:
//! - [`filter`] decides which changed paths count (dotfiles and configured
//!   exclude globs never do).
//! - [`watcher`] wires up `notify` and forwards matching changes into an
//!   async channel.
//! - [`watch_and_rebuild`] owns the rebuild policy: one build at a time,
//!   bursts of events coalesce into a single rebuild, and changes observed
//!   while a build runs queue at most one follow-up build.

pub mod filter;
pub mod watcher;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::errors::Result;
use crate::exec::ScriptRunner;
use crate::pipeline::Pipeline;

pub use filter::WatchFilter;
pub use watcher::{spawn_watcher, ChangeEvent, WatcherHandle};

/// How long to wait after the first event of a burst before rebuilding, so
/// editor save sequences (create + write + rename) become one rebuild.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(200);

/// Wait for the next change, then swallow the rest of its burst.
///
/// Returns `None` when the watcher side of the channel has gone away.
/// Because the caller only calls this between builds, events that piled up
/// during a build also collapse into the single change returned here.
/// That is the queue-one-pending rebuild policy.
pub async fn next_change(
    changes: &mut mpsc::UnboundedReceiver<ChangeEvent>,
    settle: Duration,
) -> Option<ChangeEvent> {
    let first = changes.recv().await?;
    tokio::time::sleep(settle).await;
    while changes.try_recv().is_ok() {}
    Some(first)
}

/// Run the initial build, then rebuild on every change until Ctrl-C.
///
/// The initial build's failure propagates (no point watching a tree that
/// never built); failures of re-triggered builds are logged and watching
/// continues.
pub async fn watch_and_rebuild<R: ScriptRunner + 'static>(
    pipeline: &Pipeline<R>,
    filter: WatchFilter,
) -> Result<()> {
    pipeline.bake().await?;

    let roots: Vec<_> = pipeline
        .paths()
        .watch_roots()
        .into_iter()
        .filter(|p| p.is_dir())
        .map(|p| p.to_path_buf())
        .collect();

    let (_handle, mut changes) = spawn_watcher(&pipeline.paths().root, &roots, filter)?;
    info!("⤷ watching for changes (^C to quit)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping watch loop");
                break;
            }
            change = next_change(&mut changes, SETTLE_WINDOW) => {
                let Some(change) = change else { break };
                info!(path = ?change.path, "change detected, rebuilding");

                if let Err(err) = pipeline.bake().await {
                    error!(error = %err, "rebuild failed, still watching");
                }
            }
        }
    }

    Ok(())
}
