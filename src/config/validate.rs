// src/config/validate.rs

use std::path::{Component, Path};
use std::time::Duration;

use crate::config::model::{ActionConfig, ActionSpec, ConfigFile, RawConfigFile, Settings};
use crate::errors::{DevwatchError, Result};
use crate::watch::ExtensionSet;
use crate::watch::patterns::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DevwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_actions(&raw)?;

        let interrupt_grace = parse_duration(&raw.config.interrupt_grace).map_err(|e| {
            DevwatchError::ConfigError(format!("[config].interrupt_grace: {e}"))
        })?;

        let actions = raw
            .action
            .iter()
            .map(|(name, action)| validate_action(name, action))
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(
            Settings { interrupt_grace },
            actions,
        ))
    }
}

fn ensure_has_actions(cfg: &RawConfigFile) -> Result<()> {
    if cfg.action.is_empty() {
        return Err(DevwatchError::ConfigError(
            "config must contain at least one [action.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_action(name: &str, action: &ActionConfig) -> Result<ActionSpec> {
    let err = |msg: String| DevwatchError::ConfigError(format!("action '{name}': {msg}"));

    let cmd = action.cmd.trim();
    if cmd.is_empty() {
        return Err(err("`cmd` must not be empty".to_string()));
    }

    validate_scope(&action.scope).map_err(err)?;

    let extensions = normalize_extensions(&action.extensions.to_vec()).map_err(err)?;

    build_globset(&action.exclude).map_err(|e| err(format!("{e:#}")))?;

    let timeout = action
        .timeout
        .as_deref()
        .map(parse_duration)
        .transpose()
        .map_err(|e| err(format!("timeout: {e}")))?;
    if timeout == Some(Duration::ZERO) {
        return Err(err("timeout must be greater than zero".to_string()));
    }

    let label = action
        .label
        .clone()
        .unwrap_or_else(|| format!("Running {name}"));

    Ok(ActionSpec {
        name: name.to_string(),
        label,
        cmd: cmd.to_string(),
        scope: action.scope.clone(),
        recursive: action.recursive,
        extensions,
        exclude: action.exclude.clone(),
        timeout,
    })
}

/// Scopes are relative to the project root and must stay inside it.
fn validate_scope(scope: &Path) -> std::result::Result<(), String> {
    for component in scope.components() {
        match component {
            Component::CurDir | Component::Normal(_) => {}
            Component::ParentDir => {
                return Err(format!("scope {scope:?} must not leave the project root"));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("scope {scope:?} must be relative to the project root"));
            }
        }
    }
    Ok(())
}

/// Classification lowercases, so stored extensions are lowercased too.
fn normalize_extensions(raw: &[String]) -> std::result::Result<ExtensionSet, String> {
    if raw.is_empty() {
        return Err("`extensions` must list at least one extension".to_string());
    }

    let mut exts = Vec::with_capacity(raw.len());
    for ext in raw {
        let ext = ext.trim();
        if !ext.starts_with('.') {
            return Err(format!(
                "extension '{ext}' must start with '.' (e.g. \".lua\")"
            ));
        }
        let ext = ext.to_lowercase();
        if !exts.contains(&ext) {
            exts.push(ext);
        }
    }

    Ok(ExtensionSet::from(exts))
}

/// Parse a duration string like `"500ms"`, `"10s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{unit}'; expected ms, s, m, or h"
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ExtensionList, DOCS_ACTION, TESTS_ACTION};
    use std::path::PathBuf;

    fn action(extensions: ExtensionList) -> ActionConfig {
        ActionConfig {
            label: None,
            cmd: "make check".to_string(),
            scope: PathBuf::from("."),
            recursive: true,
            extensions,
            exclude: Vec::new(),
            timeout: None,
        }
    }

    fn raw_with(name: &str, action: ActionConfig) -> RawConfigFile {
        let mut raw = RawConfigFile::default();
        raw.action.clear();
        raw.action.insert(name.to_string(), action);
        raw
    }

    #[test]
    fn defaults_validate_to_tests_and_docs() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        let names: Vec<_> = cfg.actions().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec![DOCS_ACTION, TESTS_ACTION]);

        let docs = cfg.action(DOCS_ACTION).unwrap();
        assert_eq!(docs.cmd, "ldoc.lua src");
        assert_eq!(docs.scope, PathBuf::from("src"));
        assert!(docs.extensions.contains(".lua"));

        let tests = cfg.action(TESTS_ACTION).unwrap();
        assert_eq!(tests.cmd, "busted");
        assert_eq!(tests.label, "Running unit tests");
        assert_eq!(cfg.settings().interrupt_grace, Duration::from_secs(1));
    }

    #[test]
    fn extensions_are_lowercased_and_deduplicated() {
        let raw = raw_with(
            "lint",
            action(ExtensionList::Many(vec![
                ".LUA".to_string(),
                ".lua".to_string(),
                ".Md".to_string(),
            ])),
        );
        let cfg = ConfigFile::try_from(raw).unwrap();
        let exts: Vec<_> = cfg.actions()[0].extensions.iter().collect();
        assert_eq!(exts, vec![".lua", ".md"]);
    }

    #[test]
    fn missing_label_defaults_to_running_name() {
        let raw = raw_with("lint", action(ExtensionList::One(".lua".to_string())));
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(cfg.actions()[0].label, "Running lint");
    }

    #[test]
    fn rejects_extension_without_dot() {
        let raw = raw_with("lint", action(ExtensionList::One("lua".to_string())));
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("must start with '.'"), "{err}");
    }

    #[test]
    fn rejects_empty_extension_list() {
        let raw = raw_with("lint", action(ExtensionList::Many(Vec::new())));
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn rejects_blank_cmd() {
        let mut a = action(ExtensionList::One(".lua".to_string()));
        a.cmd = "   ".to_string();
        assert!(ConfigFile::try_from(raw_with("lint", a)).is_err());
    }

    #[test]
    fn rejects_scope_outside_root() {
        let mut a = action(ExtensionList::One(".lua".to_string()));
        a.scope = PathBuf::from("../elsewhere");
        assert!(ConfigFile::try_from(raw_with("lint", a.clone())).is_err());

        a.scope = PathBuf::from("/abs/path");
        assert!(ConfigFile::try_from(raw_with("lint", a)).is_err());
    }

    #[test]
    fn rejects_invalid_exclude_glob() {
        let mut a = action(ExtensionList::One(".lua".to_string()));
        a.exclude = vec!["src/[".to_string()];
        assert!(ConfigFile::try_from(raw_with("lint", a)).is_err());
    }

    #[test]
    fn parses_and_rejects_timeouts() {
        let mut a = action(ExtensionList::One(".lua".to_string()));
        a.timeout = Some("2m".to_string());
        let cfg = ConfigFile::try_from(raw_with("lint", a.clone())).unwrap();
        assert_eq!(cfg.actions()[0].timeout, Some(Duration::from_secs(120)));

        a.timeout = Some("0s".to_string());
        assert!(ConfigFile::try_from(raw_with("lint", a.clone())).is_err());

        a.timeout = Some("soon".to_string());
        assert!(ConfigFile::try_from(raw_with("lint", a)).is_err());
    }

    #[test]
    fn rejects_empty_action_table() {
        let mut raw = RawConfigFile::default();
        raw.action.clear();
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("at least one [action"), "{err}");
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("15").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn parse_duration_rejects_overflowing_values() {
        let err = parse_duration("400000000000000000h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn overflowing_timeout_is_a_config_error() {
        let mut a = action(ExtensionList::One(".lua".to_string()));
        a.timeout = Some("400000000000000000h".to_string());
        let err = ConfigFile::try_from(raw_with("lint", a)).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
    }
}
