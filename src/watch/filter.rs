// src/watch/filter.rs

use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Decides whether a changed path should trigger a rebuild.
///
/// Dotfiles (any path component starting with `.`) are always ignored;
/// `[watch].exclude` globs are matched against the path relative to the
/// project root.
#[derive(Clone)]
pub struct WatchFilter {
    exclude: Option<GlobSet>,
}

impl std::fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchFilter")
            .field("has_excludes", &self.exclude.is_some())
            .finish()
    }
}

impl WatchFilter {
    pub fn new(exclude_patterns: &[String]) -> Result<Self> {
        let exclude = if exclude_patterns.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pat in exclude_patterns {
                let glob = Glob::new(pat)
                    .with_context(|| format!("invalid [watch].exclude glob pattern: {pat}"))?;
                builder.add(glob);
            }
            Some(builder.build().context("building exclude globset")?)
        };

        Ok(Self { exclude })
    }

    /// `rel_path` is the changed path relative to the project root, with
    /// forward slashes.
    pub fn is_relevant(&self, rel_path: &str) -> bool {
        if has_dot_component(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

fn has_dot_component(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .any(|part| part.starts_with('.') && part != "." && part != "..")
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotfiles_are_ignored() {
        let filter = WatchFilter::new(&[]).unwrap();
        assert!(!filter.is_relevant(".git/index"));
        assert!(!filter.is_relevant("src/.slide01.htm.swp"));
        assert!(filter.is_relevant("src/slide01.htm"));
    }

    #[test]
    fn exclude_globs_apply() {
        let filter = WatchFilter::new(&["**/*.tmp".to_string()]).unwrap();
        assert!(!filter.is_relevant("src/scratch.tmp"));
        assert!(filter.is_relevant("src/scratch.scss"));
    }
}
