// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{DeckbakeError, Result};

/// Top-level configuration as read from a TOML file (`Deckbake.toml`):
///
/// ```toml
/// [paths]
/// source_dir = "./src"
/// output_dir = "./build"
///
/// [remote]
/// username = "ci"
/// server = "content.example.com"
///
/// [screenshots.full]
/// width = 1024
/// height = 768
/// suffix = "-full"
/// ```
///
/// All sections are optional and have defaults matching a conventional
/// project layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Project directory layout from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// Content-server target and credentials from `[remote]`.
    ///
    /// Only required when the controls or publish stage is enabled.
    #[serde(default)]
    pub remote: RemoteSection,

    /// Screenshot sizing and concurrency from `[screenshots]`.
    #[serde(default)]
    pub screenshots: ScreenshotSection,

    /// Collaborator commands from `[tools]`.
    #[serde(default)]
    pub tools: ToolsSection,

    /// Watch-mode tuning from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[paths]` section. All directories are interpreted relative to the
/// project root (the directory containing the config file), except
/// `zips_dir` and `ctls_dir` which are subdirectories of the output dir.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_globals_dir")]
    pub globals_dir: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_partials_dir")]
    pub partials_dir: String,

    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    #[serde(default = "default_zips_dir")]
    pub zips_dir: String,

    #[serde(default = "default_ctls_dir")]
    pub ctls_dir: String,
}

fn default_globals_dir() -> String {
    "./global_includes".to_string()
}

fn default_output_dir() -> String {
    "./build".to_string()
}

fn default_partials_dir() -> String {
    "./partials/sections".to_string()
}

fn default_source_dir() -> String {
    "./src".to_string()
}

fn default_temp_dir() -> String {
    "./temp".to_string()
}

fn default_templates_dir() -> String {
    "./partials/full_templates".to_string()
}

fn default_zips_dir() -> String {
    "_zips".to_string()
}

fn default_ctls_dir() -> String {
    "_ctls".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            globals_dir: default_globals_dir(),
            output_dir: default_output_dir(),
            partials_dir: default_partials_dir(),
            source_dir: default_source_dir(),
            temp_dir: default_temp_dir(),
            templates_dir: default_templates_dir(),
            zips_dir: default_zips_dir(),
            ctls_dir: default_ctls_dir(),
        }
    }
}

/// `[remote]` section. Every field is optional at load time; the stages
/// that need credentials ask for them explicitly and fail with a
/// configuration error when one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteSection {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl RemoteSection {
    fn required(&self, field: &str, value: &Option<String>) -> Result<String> {
        value.clone().ok_or_else(|| {
            DeckbakeError::Config(format!("[remote].{field} is required for this stage"))
        })
    }

    /// Credentials needed by the control-file generation stage.
    pub fn controls_credentials(&self) -> Result<ControlsCredentials> {
        Ok(ControlsCredentials {
            username: self.required("username", &self.username)?,
            password: self.required("password", &self.password)?,
            email: self.required("email", &self.email)?,
        })
    }

    /// Credentials + target needed by the publish stage.
    pub fn publish_credentials(&self) -> Result<PublishCredentials> {
        Ok(PublishCredentials {
            username: self.required("username", &self.username)?,
            password: self.required("password", &self.password)?,
            server: self.required("server", &self.server)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ControlsCredentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct PublishCredentials {
    pub username: String,
    pub password: String,
    pub server: String,
}

/// One screenshot output variant: viewport/raster size plus the suffix
/// appended to the slide name (e.g. `-full` -> `slide01-full.jpg`).
#[derive(Debug, Clone, Deserialize)]
pub struct SizeSpec {
    pub width: u32,
    pub height: u32,
    pub suffix: String,
}

/// `[screenshots]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotSection {
    #[serde(default = "default_full_size")]
    pub full: SizeSpec,

    #[serde(default = "default_thumb_size")]
    pub thumb: SizeSpec,

    /// Maximum number of screenshot jobs rendered at the same time. Each
    /// job spawns browser/convert processes, so this is a process cap.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_full_size() -> SizeSpec {
    SizeSpec {
        width: 1024,
        height: 768,
        suffix: "-full".to_string(),
    }
}

fn default_thumb_size() -> SizeSpec {
    SizeSpec {
        width: 200,
        height: 150,
        suffix: "-thumb".to_string(),
    }
}

fn default_concurrency() -> usize {
    4
}

impl Default for ScreenshotSection {
    fn default() -> Self {
        Self {
            full: default_full_size(),
            thumb: default_thumb_size(),
            concurrency: default_concurrency(),
        }
    }
}

/// `[tools]` section: names of the external collaborator commands. These
/// are resolved through `PATH` unless given as paths.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// Directory holding the collaborator scripts (relink.py, genctls.py,
    /// publish.py, package_slides.sh, render_templates.py, compile_sass.py).
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default = "default_shell")]
    pub shell: String,

    /// Headless browser used to render non-PDF slides.
    #[serde(default = "default_browser")]
    pub browser: String,

    /// ImageMagick-style convert command used for PDF rasterization,
    /// flattening and thumbnail resizing.
    #[serde(default = "default_convert")]
    pub convert: String,
}

fn default_scripts_dir() -> String {
    "./lib".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_browser() -> String {
    "chromium".to_string()
}

fn default_convert() -> String {
    "convert".to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            python: default_python(),
            shell: default_shell(),
            browser: default_browser(),
            convert: default_convert(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Glob patterns (relative to the project root) whose changes should
    /// not trigger a rebuild. Dotfiles are always ignored.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// All project paths resolved to absolute paths, computed once before any
/// stage runs. Stages only ever see these, never the raw `[paths]` strings.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub root: PathBuf,
    pub globals: PathBuf,
    pub dest: PathBuf,
    pub partials: PathBuf,
    pub source: PathBuf,
    pub temp: PathBuf,
    pub templates: PathBuf,
    pub zips: PathBuf,
    pub ctls: PathBuf,
    pub scripts: PathBuf,
}

impl BuildPaths {
    /// Resolve the `[paths]` section against a project root.
    ///
    /// `zips` and `ctls` live under the output directory; everything else
    /// is joined onto the root.
    pub fn resolve(root: impl Into<PathBuf>, paths: &PathsSection, tools: &ToolsSection) -> Self {
        let root: PathBuf = root.into();
        let root = root.canonicalize().unwrap_or(root); // best-effort

        let dest = root.join(&paths.output_dir);
        Self {
            globals: root.join(&paths.globals_dir),
            partials: root.join(&paths.partials_dir),
            source: root.join(&paths.source_dir),
            temp: root.join(&paths.temp_dir),
            templates: root.join(&paths.templates_dir),
            zips: dest.join(&paths.zips_dir),
            ctls: dest.join(&paths.ctls_dir),
            scripts: root.join(&tools.scripts_dir),
            dest,
            root,
        }
    }

    /// Path to a named collaborator script inside the scripts directory.
    pub fn script(&self, name: &str) -> PathBuf {
        self.scripts.join(name)
    }

    /// The directories the watch loop observes for changes.
    pub fn watch_roots(&self) -> Vec<&Path> {
        vec![
            self.source.as_path(),
            self.partials.as_path(),
            self.globals.as_path(),
            self.templates.as_path(),
        ]
    }
}
