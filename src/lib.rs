// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fsops;
pub mod logging;
pub mod pipeline;
pub mod screenshot;
pub mod watch;

use std::path::PathBuf;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::project_root;
use crate::config::{load_and_validate, BuildPaths};
use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::pipeline::{stage_plan, Flags, Pipeline};
use crate::watch::WatchFilter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and path resolution
/// - flags from the CLI
/// - the pipeline with the real shell runner
/// - either a one-shot build or the watch loop
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let flags = Flags::from_args(&args);

    if args.dry_run {
        print_dry_run(&flags);
        return Ok(());
    }

    info!("deckbake {}", env!("CARGO_PKG_VERSION"));

    let paths = BuildPaths::resolve(project_root(&config_path), &cfg.paths, &cfg.tools);
    let runner = ShellRunner::new(flags.verbose);
    let pipeline = Pipeline::new(&cfg, paths, flags.clone(), runner);

    if args.nuke {
        info!("⤷ nuking old build output");
        pipeline.nuke().await?;
    }

    if flags.watch {
        let filter = WatchFilter::new(&cfg.watch.exclude)?;
        watch::watch_and_rebuild(&pipeline, filter).await
    } else {
        pipeline.bake().await
    }
}

/// Simple dry-run output: the stage chain with run/skip per flag.
fn print_dry_run(flags: &Flags) {
    println!("deckbake dry-run");
    for (name, enabled) in stage_plan(flags) {
        let marker = if enabled { "run " } else { "skip" };
        println!("  [{marker}] {name}");
    }
}
