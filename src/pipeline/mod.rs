// src/pipeline/mod.rs

//! The staged build pipeline.
//!
//! [`Pipeline::bake`] chains the stages strictly in order; each stage is
//! gated by one flag through [`run_when`] and the first failure aborts the
//! rest of the chain. The stage bodies live in [`stages`].

pub mod stages;
pub mod step;

use std::sync::Arc;

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{BuildPaths, ConfigFile, RemoteSection, ScreenshotSection, ToolsSection};
use crate::errors::Result;
use crate::exec::ScriptRunner;

pub use step::{run_when, Condition};

/// One boolean switch per stage, fixed for the duration of a build
/// invocation. Constructed once from the CLI and passed around by value.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub bake: bool,
    pub relink: bool,
    pub veev2rel: bool,
    pub screenshots: bool,
    pub package: bool,
    pub controls: bool,
    pub publish: bool,
    pub clean: bool,
    pub watch: bool,
    pub verbose: bool,
}

impl Flags {
    /// Derive the stage flags from CLI arguments, expanding the shortcut
    /// flags (`--dev`, `--*-only`).
    pub fn from_args(args: &CliArgs) -> Self {
        let mut flags = Self {
            bake: !args.nobake,
            relink: args.relink,
            veev2rel: args.veev2rel,
            screenshots: args.screenshots,
            package: args.package,
            controls: args.controls,
            publish: args.publish,
            clean: args.clean,
            watch: args.watch,
            verbose: args.verbose,
        };

        if args.dev {
            // Quick-bake test kitchen: rebuild on change with relative
            // links, skip the slow stages.
            flags.watch = true;
            flags.veev2rel = true;
            flags.clean = true;
            flags.screenshots = false;
            flags.package = false;
        }

        if args.controls_only || args.package_only || args.publish_only {
            flags.bake = false;
            flags.controls = flags.controls || args.controls_only;
            flags.package = flags.package || args.package_only;
            flags.publish = flags.publish || args.publish_only;
        }

        flags
    }
}

/// The build orchestrator: resolved paths, stage flags, and the runner the
/// stages invoke collaborators through.
pub struct Pipeline<R: ScriptRunner> {
    pub(crate) paths: BuildPaths,
    pub(crate) remote: RemoteSection,
    pub(crate) shots: ScreenshotSection,
    pub(crate) tools: ToolsSection,
    pub(crate) flags: Flags,
    pub(crate) runner: Arc<R>,
}

impl<R: ScriptRunner + 'static> Pipeline<R> {
    pub fn new(cfg: &ConfigFile, paths: BuildPaths, flags: Flags, runner: R) -> Self {
        Self {
            paths,
            remote: cfg.remote.clone(),
            shots: cfg.screenshots.clone(),
            tools: cfg.tools.clone(),
            flags,
            runner: Arc::new(runner),
        }
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    /// Run the full stage chain once and report the outcome.
    pub async fn bake(&self) -> Result<()> {
        let result = self.run_stages().await;
        match &result {
            Ok(()) => info!("✔ build finished"),
            Err(err) => error!(error = %err, "✗ build failed"),
        }
        result
    }

    async fn run_stages(&self) -> Result<()> {
        let f = &self.flags;

        run_when(f.bake, || self.ensure_temp(), None, None).await?;
        run_when(
            f.bake,
            || self.bake_partials(),
            Some("⤷ baking partials and templates"),
            None,
        )
        .await?;
        run_when(
            f.bake,
            || self.compile_styles(),
            Some("⤷ compiling stylesheets"),
            None,
        )
        .await?;
        run_when(
            f.relink,
            || self.relink(),
            Some("⤷ rewriting internal links"),
            None,
        )
        .await?;
        run_when(
            f.veev2rel,
            || self.veev2rel(),
            Some("⤷ converting links to relative"),
            None,
        )
        .await?;
        run_when(
            f.screenshots,
            || self.screenshots(),
            Some("⤷ taking screenshots"),
            None,
        )
        .await?;
        run_when(
            f.package,
            || self.package(),
            Some("⤷ packaging slides"),
            None,
        )
        .await?;
        run_when(
            f.controls,
            || self.generate_controls(),
            Some("⤷ generating control files"),
            None,
        )
        .await?;
        run_when(
            f.publish,
            || self.publish(),
            Some("⤷ publishing to content server"),
            None,
        )
        .await?;
        run_when(
            f.clean,
            || self.clean_temp(),
            Some("⤷ cleaning temp directory"),
            None,
        )
        .await?;

        Ok(())
    }
}

/// Stage names in chain order, paired with whether the given flags would
/// run them. Used by `--dry-run`.
pub fn stage_plan(flags: &Flags) -> Vec<(&'static str, bool)> {
    vec![
        ("ensure-temp", flags.bake),
        ("bake-partials", flags.bake),
        ("compile-styles", flags.bake),
        ("relink", flags.relink),
        ("convert-format", flags.veev2rel),
        ("screenshot", flags.screenshots),
        ("package", flags.package),
        ("generate-control-files", flags.controls),
        ("publish", flags.publish),
        ("clean", flags.clean),
    ]
}
