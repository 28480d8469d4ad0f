// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every pipeline stage is gated by exactly one flag here. Baking is on by
//! default (`--nobake` turns it off); everything else is opt-in.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `deckbake`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "deckbake",
    version,
    about = "Bake, relink, screenshot, package and publish a slide deck build tree.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Deckbake.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Deckbake.toml")]
    pub config: String,

    /// Don't compile templates and stylesheets (baking is on by default).
    #[arg(long)]
    pub nobake: bool,

    /// Rewrite internal references to integrated links after baking.
    #[arg(long)]
    pub relink: bool,

    /// Convert integrated hrefs back to relative links.
    #[arg(long)]
    pub veev2rel: bool,

    /// Render a full-size and thumbnail screenshot per slide.
    #[arg(long)]
    pub screenshots: bool,

    /// Package the build output into per-slide archives.
    #[arg(long)]
    pub package: bool,

    /// Generate a control file per packaged archive.
    #[arg(long)]
    pub controls: bool,

    /// Upload archives and control files to the content server.
    #[arg(long)]
    pub publish: bool,

    /// Remove the temp directory once the pipeline has finished.
    #[arg(long)]
    pub clean: bool,

    /// Watch source/partials/globals/templates and rebuild on change.
    #[arg(long)]
    pub watch: bool,

    /// Echo collaborator stdout while scripts run.
    #[arg(long)]
    pub verbose: bool,

    /// Quick-bake dev loop: shortcut for --clean --watch --veev2rel
    /// (no screenshots, no packaging).
    #[arg(long)]
    pub dev: bool,

    /// Only generate control files (implies --nobake).
    #[arg(long = "controls-only")]
    pub controls_only: bool,

    /// Only package the existing build output (implies --nobake).
    #[arg(long = "package-only")]
    pub package_only: bool,

    /// Only publish the existing archives (implies --nobake).
    #[arg(long = "publish-only")]
    pub publish_only: bool,

    /// Remove the output and temp trees before running the pipeline.
    #[arg(long)]
    pub nuke: bool,

    /// Print the resolved stage plan, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DECKBAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
