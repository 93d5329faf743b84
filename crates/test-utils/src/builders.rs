#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use devwatch::config::{ActionConfig, ConfigFile, ConfigSection, ExtensionList, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts with no actions; add the built-in pair with `with_default_actions`.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                action: BTreeMap::new(),
            },
        }
    }

    pub fn with_default_actions(mut self) -> Self {
        self.config.action = devwatch::config::model::default_actions();
        self
    }

    pub fn with_action(mut self, name: &str, action: ActionConfig) -> Self {
        self.config.action.insert(name.to_string(), action);
        self
    }

    pub fn interrupt_grace(mut self, grace: &str) -> Self {
        self.config.config.interrupt_grace = grace.to_string();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ActionConfig`.
pub struct ActionBuilder {
    action: ActionConfig,
}

impl ActionBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            action: ActionConfig {
                label: None,
                cmd: cmd.to_string(),
                scope: PathBuf::from("."),
                recursive: true,
                extensions: ExtensionList::Many(Vec::new()),
                exclude: Vec::new(),
                timeout: None,
            },
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.action.label = Some(label.to_string());
        self
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.action.scope = PathBuf::from(scope);
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.action.recursive = val;
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        let mut exts = self.action.extensions.to_vec();
        exts.push(ext.to_string());
        self.action.extensions = ExtensionList::Many(exts);
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.action.exclude.push(pattern.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.action.timeout = Some(timeout.to_string());
        self
    }

    pub fn build(self) -> ActionConfig {
        self.action
    }
}
