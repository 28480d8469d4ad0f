// src/pipeline/stages.rs

//! The individual pipeline stages and their collaborator call contracts.
//!
//! Each stage either wraps a filesystem helper or builds a [`ScriptCall`]
//! for one of the collaborator scripts. Argument shapes follow the scripts'
//! own CLIs and must not drift from them.

use crate::exec::{ScriptCall, ScriptRunner};
use crate::fsops;
use crate::screenshot;
use crate::errors::Result;

use super::Pipeline;

impl<R: ScriptRunner + 'static> Pipeline<R> {
    /// Stage 1: make sure the temp directory exists.
    pub(super) async fn ensure_temp(&self) -> Result<()> {
        fsops::ensure_dir(&self.paths.temp).await
    }

    /// Stage 2: inline partials, templates and global assets from the
    /// source tree into the temp tree.
    pub(super) async fn bake_partials(&self) -> Result<()> {
        let call = ScriptCall::new(
            &self.tools.python,
            [
                self.paths.script("render_templates.py"),
                self.paths.source.clone(),
                self.paths.temp.clone(),
                self.paths.templates.clone(),
                self.paths.partials.clone(),
                self.paths.globals.clone(),
            ]
            .map(path_arg),
            "Baking",
        );
        self.runner.run(call).await
    }

    /// Stage 3: compile stylesheets, temp tree -> output tree.
    pub(super) async fn compile_styles(&self) -> Result<()> {
        let call = ScriptCall::new(
            &self.tools.python,
            [
                self.paths.script("compile_sass.py"),
                self.paths.temp.clone(),
                self.paths.dest.clone(),
            ]
            .map(path_arg),
            "Styles",
        );
        self.runner.run(call).await
    }

    /// Stage 4: rewrite internal references in the output tree.
    pub(super) async fn relink(&self) -> Result<()> {
        self.runner.run(self.relink_call("--integrate_all", "Linking")).await
    }

    /// Stage 5: convert integrated hrefs back to relative links.
    pub(super) async fn veev2rel(&self) -> Result<()> {
        self.runner.run(self.relink_call("--veev2rel", "veev2rel")).await
    }

    fn relink_call(&self, mode: &str, label: &str) -> ScriptCall {
        ScriptCall::new(
            &self.tools.python,
            [
                path_arg(self.paths.script("relink.py")),
                mode.to_string(),
                path_arg(self.paths.dest.clone()),
            ],
            label,
        )
    }

    /// Stage 6: per-slide full and thumbnail screenshots.
    pub(super) async fn screenshots(&self) -> Result<()> {
        screenshot::capture_all(
            &self.paths.dest,
            &self.shots,
            &self.tools,
            self.runner.clone(),
        )
        .await
    }

    /// Stage 7: package the output tree into per-slide archives. The
    /// packaging script takes no arguments and works from its cwd.
    pub(super) async fn package(&self) -> Result<()> {
        let call = ScriptCall::new(
            &self.tools.shell,
            [path_arg(self.paths.script("package_slides.sh"))],
            "Packaging",
        )
        .with_cwd(&self.paths.dest);
        self.runner.run(call).await
    }

    /// Stage 8: generate one control file per packaged archive.
    pub(super) async fn generate_controls(&self) -> Result<()> {
        let creds = self.remote.controls_credentials()?;
        let call = ScriptCall::new(
            &self.tools.python,
            [
                path_arg(self.paths.script("genctls.py")),
                "--src".to_string(),
                path_arg(self.paths.zips.clone()),
                "--out".to_string(),
                path_arg(self.paths.ctls.clone()),
                "--root".to_string(),
                path_arg(self.paths.root.clone()),
                "--u".to_string(),
                creds.username,
                "--pwd".to_string(),
                creds.password,
                "--email".to_string(),
                creds.email,
            ],
            "Generating control files",
        );
        self.runner.run(call).await
    }

    /// Stage 9: upload archives and control files to the content server.
    pub(super) async fn publish(&self) -> Result<()> {
        let creds = self.remote.publish_credentials()?;
        let call = ScriptCall::new(
            &self.tools.python,
            [
                path_arg(self.paths.script("publish.py")),
                "--zip".to_string(),
                path_arg(self.paths.zips.clone()),
                "--ctl".to_string(),
                path_arg(self.paths.ctls.clone()),
                "--host".to_string(),
                creds.server,
                "--u".to_string(),
                creds.username,
                "--pwd".to_string(),
                creds.password,
            ],
            "Publishing slides",
        );
        self.runner.run(call).await
    }

    /// Stage 10: remove the temp directory.
    pub(super) async fn clean_temp(&self) -> Result<()> {
        fsops::remove_dir(&self.paths.temp).await
    }

    /// Pre-step for `--nuke`: drop the output and temp trees.
    pub async fn nuke(&self) -> Result<()> {
        fsops::remove_dir(&self.paths.dest).await?;
        fsops::remove_dir(&self.paths.temp).await
    }
}

fn path_arg(path: std::path::PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
