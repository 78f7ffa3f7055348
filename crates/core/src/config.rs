//! Workspace configuration, read but never written.
//!
//! Lookup order for a key: a `XCRUNNER_`-prefixed environment variable,
//! then the `.xcrunner/config.json` document, then nothing. Values found
//! here count as explicit input to resolution, so they are never echoed
//! back into the selection state.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::state::store::STATE_DIR;

const CONFIG_FILE: &str = "config.json";

/// Environment variables starting with this prefix shadow config keys.
pub const ENV_PREFIX: &str = "XCRUNNER_";

/// Architecture override, becomes `ARCHS` plus `ONLY_ACTIVE_ARCH=YES`.
pub const ARCH_KEY: &str = "cli.arch";
/// Derived-data path handed to xcodebuild.
pub const DERIVED_DATA_KEY: &str = "cli.derived_data";
/// JSON object of build-setting overrides appended after everything else.
pub const BUILD_SETTINGS_KEY: &str = "cli.build_settings";
/// Boolean, same effect as the `--debug` flag.
pub const DEBUG_KEY: &str = "cli.debug";
/// Xcode installation to build with, exported as `DEVELOPER_DIR`.
pub const DEVELOPER_DIR_KEY: &str = "cli.developer_dir";

/// Snapshot of the configuration sources for one run.
///
/// The environment is captured at load time, so lookups stay consistent
/// even if the process environment changes mid-run.
#[derive(Debug, Clone, Default)]
pub struct ConfigReader {
    file: BTreeMap<String, Value>,
    env: Vec<(String, String)>,
}

impl ConfigReader {
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(CONFIG_FILE)
    }

    /// Load the config document for a workspace root. A missing file is
    /// an empty document; anything unparsable is [`Error::Config`].
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                Error::Config(format!("unreadable config {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            file,
            env: prefixed_env(),
        })
    }

    /// Load, trading an unreadable document for an empty one with a
    /// warning.
    pub fn load_or_default(root: &Path) -> Self {
        match Self::load(root) {
            Ok(reader) => reader,
            Err(err) => {
                warn!("ignoring unreadable config: {err}");
                Self {
                    file: BTreeMap::new(),
                    env: prefixed_env(),
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let wanted = env_key(key);
        if let Some((_, raw)) = self.env.iter().find(|(name, _)| *name == wanted) {
            return Some(typed(raw));
        }
        self.file.get(key).cloned()
    }

    /// Scalar values read as strings; arrays and objects do not.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_str(key).map(PathBuf::from)
    }
}

/// `cli.derived_data` becomes `XCRUNNER_CLI_DERIVED_DATA`.
pub fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_uppercase().replace('.', "_"))
}

fn prefixed_env() -> Vec<(String, String)> {
    std::env::vars()
        .filter(|(name, _)| name.starts_with(ENV_PREFIX))
        .collect()
}

/// Environment values are plain text; give booleans and JSON literals
/// their structured shape, and fall back to the raw string when a literal
/// does not parse.
fn typed(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if raw.starts_with('{') || raw.starts_with('[') => {
            serde_json::from_str(raw).unwrap_or_else(|err| {
                warn!("treating malformed JSON in environment as a string: {err}");
                Value::String(raw.to_string())
            })
        }
        _ => Value::String(raw.to_string()),
    }
}
