// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File looked up in the project root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "Devwatch.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Decide which configuration applies.
///
/// - An explicit path must exist and parse.
/// - Otherwise `<root>/Devwatch.toml` is used when present.
/// - Otherwise the built-in defaults.
pub fn resolve_config(explicit: Option<&Path>, root: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(?path, "loading config from --config");
        return load_and_validate(path);
    }

    let candidate = default_config_path(root);
    if candidate.is_file() {
        debug!(path = ?candidate, "loading project config");
        return load_and_validate(&candidate);
    }

    debug!("no config file found; using built-in actions");
    ConfigFile::try_from(RawConfigFile::default())
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TESTS_ACTION;

    #[test]
    fn falls_back_to_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = resolve_config(None, dir.path()).unwrap();
        assert!(cfg.action(TESTS_ACTION).is_some());
    }

    #[test]
    fn picks_up_project_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            default_config_path(dir.path()),
            "[action.check]\ncmd = \"make check\"\nextensions = \".c\"\n",
        )
        .unwrap();

        let cfg = resolve_config(None, dir.path()).unwrap();
        assert_eq!(cfg.actions().len(), 1);
        assert_eq!(cfg.actions()[0].name, "check");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[config]\npoll = 3\n").unwrap();
        assert!(load_and_validate(&path).is_err());
    }
}
