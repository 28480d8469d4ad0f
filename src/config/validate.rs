// src/config/validate.rs

use anyhow::{anyhow, Context};
use globset::Glob;

use crate::config::model::{ConfigFile, SizeSpec};
use crate::errors::Result;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - no `[paths]` entry is empty
/// - screenshot sizes have non-zero dimensions and distinct suffixes
/// - `[screenshots].concurrency >= 1`
/// - `[watch].exclude` patterns are valid globs
///
/// It does **not** check that any directory exists: the source tree may be
/// scaffolded after the config is written, and the pipeline creates the
/// temp/output trees itself.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_screenshots(cfg)?;
    validate_watch_excludes(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &ConfigFile) -> Result<()> {
    let entries = [
        ("globals_dir", &cfg.paths.globals_dir),
        ("output_dir", &cfg.paths.output_dir),
        ("partials_dir", &cfg.paths.partials_dir),
        ("source_dir", &cfg.paths.source_dir),
        ("temp_dir", &cfg.paths.temp_dir),
        ("templates_dir", &cfg.paths.templates_dir),
        ("zips_dir", &cfg.paths.zips_dir),
        ("ctls_dir", &cfg.paths.ctls_dir),
    ];

    for (name, value) in entries {
        if value.trim().is_empty() {
            return Err(anyhow!("[paths].{name} must not be empty").into());
        }
    }

    // An empty temp_dir relative to root would make the clean stage remove
    // the project root itself.
    if cfg.paths.temp_dir.trim_matches(['.', '/']).is_empty() {
        return Err(anyhow!(
            "[paths].temp_dir must name a subdirectory (got {:?})",
            cfg.paths.temp_dir
        )
        .into());
    }

    Ok(())
}

fn validate_screenshots(cfg: &ConfigFile) -> Result<()> {
    check_size("full", &cfg.screenshots.full)?;
    check_size("thumb", &cfg.screenshots.thumb)?;

    if cfg.screenshots.full.suffix == cfg.screenshots.thumb.suffix {
        return Err(anyhow!(
            "[screenshots] full and thumb suffixes must differ (both are {:?})",
            cfg.screenshots.full.suffix
        )
        .into());
    }

    if cfg.screenshots.concurrency == 0 {
        return Err(anyhow!("[screenshots].concurrency must be >= 1 (got 0)").into());
    }

    Ok(())
}

fn check_size(which: &str, size: &SizeSpec) -> Result<()> {
    if size.width == 0 || size.height == 0 {
        return Err(anyhow!(
            "[screenshots.{which}] must have non-zero width and height (got {}x{})",
            size.width,
            size.height
        )
        .into());
    }
    if size.suffix.is_empty() {
        return Err(anyhow!("[screenshots.{which}].suffix must not be empty").into());
    }
    Ok(())
}

fn validate_watch_excludes(cfg: &ConfigFile) -> Result<()> {
    for pat in &cfg.watch.exclude {
        Glob::new(pat)
            .with_context(|| format!("invalid [watch].exclude glob pattern: {pat}"))?;
    }
    Ok(())
}
