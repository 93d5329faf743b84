// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::watch::ExtensionSet;

/// Name of the default tests action.
pub const TESTS_ACTION: &str = "tests";
/// Name of the default docs action.
pub const DOCS_ACTION: &str = "docs";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// interrupt_grace = "1s"
///
/// [action.tests]
/// cmd = "busted"
/// extensions = ".lua"
///
/// [action.docs]
/// label = "Building docs"
/// cmd = "ldoc.lua src"
/// scope = "src"
/// extensions = [".lua"]
/// ```
///
/// Every section is optional. Without any `[action.*]` table the built-in
/// `tests` and `docs` actions are used.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All actions from `[action.<name>]`.
    #[serde(default = "default_actions")]
    pub action: BTreeMap<String, ActionConfig>,
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            config: ConfigSection::default(),
            action: default_actions(),
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// How long after a restart a second interrupt still ends the program,
    /// e.g. `"1s"` or `"500ms"`. `"0ms"` disables the window.
    #[serde(default = "default_interrupt_grace")]
    pub interrupt_grace: String,
}

fn default_interrupt_grace() -> String {
    "1s".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            interrupt_grace: default_interrupt_grace(),
        }
    }
}

/// `[action.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// Banner label; defaults to `Running <name>`.
    #[serde(default)]
    pub label: Option<String>,

    /// Shell command line to run from the project root.
    pub cmd: String,

    /// Directory to watch, relative to the project root.
    #[serde(default = "default_scope")]
    pub scope: PathBuf,

    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// One extension (`".lua"`) or a list of them.
    pub extensions: ExtensionList,

    /// Globs (relative to the project root) this action never reacts to.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Kill the command if it runs longer than this, e.g. `"10m"`.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_scope() -> PathBuf {
    PathBuf::from(".")
}

fn default_recursive() -> bool {
    true
}

/// `extensions = ".lua"` or `extensions = [".lua", ".md"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExtensionList {
    One(String),
    Many(Vec<String>),
}

impl ExtensionList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ExtensionList::One(ext) => vec![ext.clone()],
            ExtensionList::Many(exts) => exts.clone(),
        }
    }
}

/// The built-in pair: unit tests over the whole tree, docs over `src/`.
///
/// Both watch `.lua`; split the sets in a config file if tests and docs
/// should react to different files.
pub fn default_actions() -> BTreeMap<String, ActionConfig> {
    let mut actions = BTreeMap::new();
    actions.insert(
        TESTS_ACTION.to_string(),
        ActionConfig {
            label: Some("Running unit tests".to_string()),
            cmd: "busted".to_string(),
            scope: default_scope(),
            recursive: true,
            extensions: ExtensionList::One(".lua".to_string()),
            exclude: Vec::new(),
            timeout: None,
        },
    );
    actions.insert(
        DOCS_ACTION.to_string(),
        ActionConfig {
            label: Some("Building docs".to_string()),
            cmd: "ldoc.lua src".to_string(),
            scope: PathBuf::from("src"),
            recursive: true,
            extensions: ExtensionList::One(".lua".to_string()),
            exclude: Vec::new(),
            timeout: None,
        },
    );
    actions
}

/// Validated global settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub interrupt_grace: Duration,
}

/// A validated action, ready to be turned into a watch registration.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: String,
    pub label: String,
    pub cmd: String,
    /// Relative to the project root.
    pub scope: PathBuf,
    pub recursive: bool,
    /// Lowercased, each with a leading dot.
    pub extensions: ExtensionSet,
    pub exclude: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    settings: Settings,
    actions: Vec<ActionSpec>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(settings: Settings, actions: Vec<ActionSpec>) -> Self {
        Self { settings, actions }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Actions in name order.
    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.name == name)
    }
}
