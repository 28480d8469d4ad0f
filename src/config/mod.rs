// src/config/mod.rs

//! Project configuration: TOML model, loading, and semantic validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    BuildPaths, ConfigFile, PathsSection, RemoteSection, ScreenshotSection, SizeSpec,
    ToolsSection, WatchSection,
};
pub use validate::validate_config;
