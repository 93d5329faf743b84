// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] holds the raw TOML mapping and the validated form.
//! - [`validate`] turns the raw form into the validated one.
//! - [`loader`] reads files and resolves which file (if any) applies.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{
    ActionConfig, ActionSpec, ConfigFile, ConfigSection, ExtensionList, RawConfigFile,
    Settings,
};
pub use validate::parse_duration;
