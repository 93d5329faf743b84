// src/watch/ext.rs

//! Extension classification.

use std::path::{is_separator, Path};

/// Lowercased extension of the final path segment, including the dot.
///
/// - `"a/b/c.LUA"` → `".lua"`
/// - `"README"` → `""`
/// - `".busted"` → `""` (leading dots belong to the name)
/// - `"foo."` → `"."`
///
/// The path does not need to exist.
pub fn classify(path: impl AsRef<Path>) -> String {
    let full = path.as_ref().to_string_lossy();
    let segment = full.rsplit(is_separator).next().unwrap_or("");

    let name = segment.trim_start_matches('.');
    let skipped = segment.len() - name.len();

    match name.rfind('.') {
        Some(idx) => segment[skipped + idx..].to_lowercase(),
        None => String::new(),
    }
}

/// The set of extensions a handler reacts to.
///
/// Built from a single extension or a sequence; membership is the only
/// operation, so order is kept as given but never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: Vec<String>,
}

impl ExtensionSet {
    pub fn contains(&self, ext: &str) -> bool {
        self.exts.iter().any(|e| e == ext)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }
}

impl From<&str> for ExtensionSet {
    fn from(ext: &str) -> Self {
        Self {
            exts: vec![ext.to_string()],
        }
    }
}

impl From<String> for ExtensionSet {
    fn from(ext: String) -> Self {
        Self { exts: vec![ext] }
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(exts: Vec<String>) -> Self {
        Self { exts }
    }
}

impl From<&[&str]> for ExtensionSet {
    fn from(exts: &[&str]) -> Self {
        Self {
            exts: exts.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for ExtensionSet {
    fn from(exts: [&str; N]) -> Self {
        Self::from(&exts[..])
    }
}
