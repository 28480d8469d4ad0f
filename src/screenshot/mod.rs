// src/screenshot/mod.rs

//! Per-slide screenshot generation.
//!
//! Every immediate subdirectory of the output tree is one slide; a slide is
//! screenshotted when it contains a file named exactly after the directory
//! with a `.htm` or `.pdf` extension. Each job renders a raw PNG (headless
//! browser for HTML, direct rasterization for PDF), flattens it to the
//! full-size JPEG, resizes that to the thumbnail, and removes the raw
//! intermediate. The raw PNG is named after the source file, so the `.htm`
//! and `.pdf` jobs of the same slide never share an intermediate.
//!
//! Jobs in the same slide directory write the same full/thumb outputs and
//! therefore run in order; distinct directories fan out under a semaphore
//! so a big deck doesn't spawn an unbounded number of browser/convert
//! processes. All jobs run to completion; the first failure fails the
//! stage, and outputs of jobs that already finished stay on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::{ScreenshotSection, SizeSpec, ToolsSection};
use crate::errors::Result;
use crate::exec::{ScriptCall, ScriptRunner};
use crate::fsops;

/// One (slide directory, source file) pair to screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotJob {
    /// Slide directory; outputs are written here.
    pub dir: PathBuf,
    /// The matched `<slide>.htm` or `<slide>.pdf` file.
    pub source: PathBuf,
    /// The slide name (directory basename), used for output naming.
    pub slide: String,
}

/// Enumerate slide directories under `dest` and match their source files.
///
/// The match is a case-sensitive comparison of the full file name against
/// `<dirname>.htm` / `<dirname>.pdf`; a directory can yield two jobs when
/// both exist.
pub async fn collect_jobs(dest: &Path) -> Result<Vec<ScreenshotJob>> {
    let mut jobs = Vec::new();

    for dir in fsops::list_dirs(dest).await? {
        let Some(slide) = dir.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };

        let wanted = [format!("{slide}.htm"), format!("{slide}.pdf")];
        for file in fsops::list_files(&dir).await? {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if wanted.iter().any(|w| w == name) {
                jobs.push(ScreenshotJob {
                    dir: dir.clone(),
                    source: file,
                    slide: slide.clone(),
                });
            }
        }
    }

    Ok(jobs)
}

/// Screenshot every matched slide under `dest`, bounded by
/// `shots.concurrency` concurrent jobs.
pub async fn capture_all<R: ScriptRunner + 'static>(
    dest: &Path,
    shots: &ScreenshotSection,
    tools: &ToolsSection,
    runner: Arc<R>,
) -> Result<()> {
    let jobs = collect_jobs(dest).await?;
    if jobs.is_empty() {
        debug!(dest = ?dest, "no slide sources matched, nothing to screenshot");
        return Ok(());
    }

    info!(jobs = jobs.len(), cap = shots.concurrency, "screenshotting slides");

    let mut by_dir: BTreeMap<PathBuf, Vec<ScreenshotJob>> = BTreeMap::new();
    for job in jobs {
        by_dir.entry(job.dir.clone()).or_default().push(job);
    }

    let semaphore = Arc::new(Semaphore::new(shots.concurrency));
    let mut set = JoinSet::new();

    for (_, group) in by_dir {
        let semaphore = Arc::clone(&semaphore);
        let runner = Arc::clone(&runner);
        let shots = shots.clone();
        let tools = tools.clone();
        set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .context("acquiring screenshot slot")?;
            capture_group(&group, &shots, &tools, runner.as_ref()).await
        });
    }

    // Let every job settle before reporting; completed siblings keep their
    // outputs even when another job failed.
    let mut first_err = None;
    while let Some(joined) = set.join_next().await {
        let outcome = joined
            .context("screenshot job panicked")
            .map_err(crate::errors::DeckbakeError::from)
            .and_then(|res| res);
        if let Err(err) = outcome {
            first_err.get_or_insert(err);
        }
    }

    match first_err {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

/// All jobs of one slide directory, in order. They share the full/thumb
/// output names, so they must not overlap.
async fn capture_group<R: ScriptRunner>(
    jobs: &[ScreenshotJob],
    shots: &ScreenshotSection,
    tools: &ToolsSection,
    runner: &R,
) -> Result<()> {
    for job in jobs {
        capture_one(job, shots, tools, runner).await?;
    }
    Ok(())
}

async fn capture_one<R: ScriptRunner>(
    job: &ScreenshotJob,
    shots: &ScreenshotSection,
    tools: &ToolsSection,
    runner: &R,
) -> Result<()> {
    debug!(slide = %job.slide, source = ?job.source, "screenshotting");

    let raw = raw_path(&job.source);
    let full = job.dir.join(format!("{}{}.jpg", job.slide, shots.full.suffix));
    let thumb = job.dir.join(format!("{}{}.jpg", job.slide, shots.thumb.suffix));

    runner.run(render_call(job, &shots.full, tools, &raw)).await?;
    runner.run(flatten_call(tools, &raw, &full)).await?;
    runner.run(resize_call(tools, &shots.thumb, &full, &thumb)).await?;
    fsops::remove_file(&raw).await?;

    Ok(())
}

/// Raw intermediate next to the source, named `<source-file>.png`.
fn raw_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".png");
    PathBuf::from(name)
}

/// Raw render: PDFs are rasterized directly at 72 dpi; anything else goes
/// through the headless browser at the full viewport size.
fn render_call(job: &ScreenshotJob, full: &SizeSpec, tools: &ToolsSection, raw: &Path) -> ScriptCall {
    let is_pdf = job.source.extension().is_some_and(|ext| ext == "pdf");

    if is_pdf {
        ScriptCall::new(
            &tools.convert,
            [
                "-density".to_string(),
                "72".to_string(),
                job.source.to_string_lossy().into_owned(),
                raw.to_string_lossy().into_owned(),
            ],
            "Rasterizing",
        )
    } else {
        ScriptCall::new(
            &tools.browser,
            [
                "--headless".to_string(),
                "--disable-gpu".to_string(),
                format!("--window-size={},{}", full.width, full.height),
                format!("--screenshot={}", raw.to_string_lossy()),
                format!("file://{}", job.source.to_string_lossy()),
            ],
            "Rendering",
        )
    }
}

/// Flatten the raw render against a white background into the full JPEG.
fn flatten_call(tools: &ToolsSection, raw: &Path, full: &Path) -> ScriptCall {
    ScriptCall::new(
        &tools.convert,
        [
            raw.to_string_lossy().into_owned(),
            "-background".to_string(),
            "white".to_string(),
            "-flatten".to_string(),
            full.to_string_lossy().into_owned(),
        ],
        "Flattening",
    )
}

/// Resize the full JPEG down to the thumbnail.
fn resize_call(tools: &ToolsSection, thumb: &SizeSpec, full: &Path, out: &Path) -> ScriptCall {
    ScriptCall::new(
        &tools.convert,
        [
            full.to_string_lossy().into_owned(),
            "-resize".to_string(),
            format!("{}x{}", thumb.width, thumb.height),
            out.to_string_lossy().into_owned(),
        ],
        "Thumbnailing",
    )
}
