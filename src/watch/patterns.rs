// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled `exclude` globs for one action.
///
/// Patterns are relative to the project root; event paths are relativized
/// against that root before matching (e.g. `".luarocks/**"`).
#[derive(Clone)]
pub struct ExcludeFilter {
    root: PathBuf,
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for ExcludeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeFilter")
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ExcludeFilter {
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let set = build_globset(patterns).context("building exclude globset")?;
        Ok(Self {
            root: root.into(),
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// Paths outside the root are never excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        match relative_str(&self.root, path) {
            Some(rel) => self.set.is_match(rel),
            None => false,
        }
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// `path` relative to `root`, with forward slashes.
///
/// Falls back to canonicalized paths when the prefixes differ only by
/// symlinks (e.g. `/var` vs `/private/var` on macOS).
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok()?;
    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
