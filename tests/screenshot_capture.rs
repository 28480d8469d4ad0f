mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use common::FakeRunner;
use deckbake::config::{ConfigFile, ScreenshotSection, ToolsSection};
use deckbake::screenshot::{capture_all, collect_jobs};

fn slide_dir(root: &Path, name: &str, files: &[&str]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), b"content").unwrap();
    }
}

#[tokio::test]
async fn matching_selects_only_sources_named_after_the_directory() {
    let tmp = tempfile::tempdir().unwrap();
    slide_dir(tmp.path(), "doc1", &["doc1.htm", "doc1.pdf", "other.htm"]);
    slide_dir(tmp.path(), "doc2", &["readme.txt", "DOC2.htm"]); // case-sensitive: no match

    let jobs = collect_jobs(tmp.path()).await.unwrap();

    let mut names: Vec<_> = jobs
        .iter()
        .map(|j| j.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["doc1.htm", "doc1.pdf"]);
    assert!(jobs.iter().all(|j| j.slide == "doc1"));
}

#[tokio::test]
async fn top_level_files_are_not_jobs() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("loose.htm"), b"x").unwrap();

    let jobs = collect_jobs(tmp.path()).await.unwrap();
    assert!(jobs.is_empty());
}

/// A behaviour that mimics the render/convert collaborators: each call
/// creates its output file (the `--screenshot=` value or the last argument).
fn filesystem_behaviour(fail_slide: Option<&'static str>) -> FakeRunner {
    FakeRunner::with_behaviour(move |call| {
        if let Some(bad) = fail_slide {
            if call.args.iter().any(|a| a.contains(bad)) {
                return Err(anyhow!("render failed for {bad}").into());
            }
        }

        let output = call
            .args
            .iter()
            .find_map(|a| a.strip_prefix("--screenshot="))
            .map(String::from)
            .or_else(|| call.args.last().cloned())
            .expect("collaborator call without arguments");
        fs::write(output, b"image").unwrap();
        Ok(())
    })
}

#[tokio::test]
async fn capture_produces_full_and_thumb_and_removes_the_raw_render() {
    let tmp = tempfile::tempdir().unwrap();
    slide_dir(tmp.path(), "doc1", &["doc1.htm"]);

    let cfg = ConfigFile::default();
    let runner = filesystem_behaviour(None);
    capture_all(tmp.path(), &cfg.screenshots, &cfg.tools, Arc::new(runner.clone()))
        .await
        .unwrap();

    let dir = tmp.path().join("doc1");
    assert!(dir.join("doc1-full.jpg").exists());
    assert!(dir.join("doc1-thumb.jpg").exists());
    assert!(!dir.join("doc1.htm.png").exists());

    assert_eq!(runner.labels(), vec!["Rendering", "Flattening", "Thumbnailing"]);
}

#[tokio::test]
async fn htm_and_pdf_in_one_slide_capture_cleanly_in_parallel_mode() {
    let tmp = tempfile::tempdir().unwrap();
    slide_dir(tmp.path(), "doc1", &["doc1.htm", "doc1.pdf"]);

    let mut shots = ScreenshotSection::default();
    shots.concurrency = 2;

    let runner = filesystem_behaviour(None);
    capture_all(tmp.path(), &shots, &ToolsSection::default(), Arc::new(runner.clone()))
        .await
        .unwrap();

    let dir = tmp.path().join("doc1");
    assert!(dir.join("doc1-full.jpg").exists());
    assert!(dir.join("doc1-thumb.jpg").exists());
    assert!(!dir.join("doc1.htm.png").exists());
    assert!(!dir.join("doc1.pdf.png").exists());

    // Each source renders from its own intermediate, and the two jobs of
    // the shared directory run back-to-back rather than interleaved.
    let calls = runner.calls();
    assert!(calls.iter().any(|c| c.args.iter().any(|a| a.ends_with("doc1.htm.png"))));
    assert!(calls.iter().any(|c| c.args.iter().any(|a| a.ends_with("doc1.pdf.png"))));

    let labels = runner.labels();
    assert_eq!(labels.len(), 6);
    for chunk in labels.chunks(3) {
        assert!(matches!(chunk[0].as_str(), "Rendering" | "Rasterizing"), "got {chunk:?}");
        assert_eq!(&chunk[1..], ["Flattening", "Thumbnailing"]);
    }
}

#[tokio::test]
async fn one_failing_job_fails_the_batch_but_keeps_sibling_output() {
    let tmp = tempfile::tempdir().unwrap();
    slide_dir(tmp.path(), "good1", &["good1.htm"]);
    slide_dir(tmp.path(), "badslide", &["badslide.htm"]);
    slide_dir(tmp.path(), "good2", &["good2.pdf"]);

    let cfg = ConfigFile::default();
    let runner = filesystem_behaviour(Some("badslide"));
    let result = capture_all(
        tmp.path(),
        &cfg.screenshots,
        &cfg.tools,
        Arc::new(runner),
    )
    .await;

    assert!(result.is_err());
    // The healthy jobs' outputs are still on disk afterwards.
    assert!(tmp.path().join("good1/good1-full.jpg").exists());
    assert!(tmp.path().join("good1/good1-thumb.jpg").exists());
    assert!(tmp.path().join("good2/good2-full.jpg").exists());
}

#[tokio::test]
async fn concurrency_cap_of_one_serializes_jobs() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c"] {
        let file = format!("{name}.htm");
        slide_dir(tmp.path(), name, &[file.as_str()]);
    }

    let mut shots = ScreenshotSection::default();
    shots.concurrency = 1;

    let runner = filesystem_behaviour(None);
    capture_all(tmp.path(), &shots, &ToolsSection::default(), Arc::new(runner.clone()))
        .await
        .unwrap();

    // With one slot, each job's three steps are contiguous in the record.
    let labels = runner.labels();
    assert_eq!(labels.len(), 9);
    for chunk in labels.chunks(3) {
        assert_eq!(chunk, ["Rendering", "Flattening", "Thumbnailing"]);
    }
}
