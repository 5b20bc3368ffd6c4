//! Keymap configuration structures for deserialization.
//!
//! Overrides live in a small toml file. Each `[modes.<section>.keys]`
//! table maps key notation to an action name; sections are `global`,
//! `inspector`, `command`, `painter`:
//!
//! ```toml
//! [modes.global.keys]
//! m = "toggle_mode"
//!
//! [modes.command.keys]
//! C-t = "train_unit"
//! ```
//!
//! Only keyboard triggers are configurable; mouse bindings are fixed.
//! Applying a config rebinds existing actions and never adds new ones,
//! see [`ModeController::apply_keymap`](crate::controller::ModeController::apply_keymap).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::input::KeyParseError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read keymap file")]
    Io(#[from] std::io::Error),
    #[error("keymap file is not valid toml")]
    Parse(#[from] toml::de::Error),
    #[error("unknown mode section {0:?}")]
    UnknownMode(String),
    #[error("mode {mode:?} has no action named {action:?}")]
    UnknownAction { mode: String, action: String },
    #[error("cannot parse key {key:?}")]
    BadKey {
        key: String,
        #[source]
        source: KeyParseError,
    },
}

/// Root keymap configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeymapConfig {
    /// Per-context key tables.
    #[serde(default)]
    pub modes: HashMap<String, ModeKeys>,
}

/// Key overrides for a single binding context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeKeys {
    /// Key notation mapped to the action name it should trigger.
    #[serde(default)]
    pub keys: HashMap<String, String>,
}

impl KeymapConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }
}
