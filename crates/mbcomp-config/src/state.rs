//! Persisted engine state: a flat key-per-band map stored as TOML.

use std::path::Path;

use mbcomp_engine::{EngineParams, GlobalParam, PARAM_COUNT, ParamKey};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// On-disk layout: an optional description followed by one float per key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    values: toml::Table,
}

/// Complete set of parameter values as saved between sessions.
///
/// Restoring is forgiving: missing keys take their default, unknown keys are
/// ignored, out-of-range values are clamped and non-numeric values fall back
/// to the default. Solo is a session setting and is not stored.
///
/// # TOML Format
///
/// ```toml
/// description = "Gentle bus glue"
/// atLow = 1.0
/// rtLow = 50.0
/// CTLow = -10.0
/// CRLow = 1.5
/// preLow = 0.0
/// postLow = 0.0
/// # ... the same six keys for Mid, High and Master
/// la = 10.0
/// f0 = 500.0
/// f1 = 10000.0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Free-form note saved alongside the values.
    pub description: Option<String>,
    values: [f32; PARAM_COUNT],
}

impl EngineState {
    /// Every parameter at its default.
    pub fn new() -> Self {
        Self {
            description: None,
            values: std::array::from_fn(|i| {
                ParamKey::from_index(i).map_or(0.0, |k| k.descriptor().default)
            }),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stored value for `key`.
    pub fn get(&self, key: ParamKey) -> f32 {
        self.values[key.index()]
    }

    /// Store a value, clamped to the parameter range. Returns the stored value.
    pub fn set(&mut self, key: ParamKey, value: f32) -> f32 {
        let clamped = key.descriptor().clamp(value);
        self.values[key.index()] = clamped;
        clamped
    }

    /// Every `(key, value)` pair, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        ParamKey::all().map(|k| (k, self.get(k)))
    }

    /// Reads the current values from a live parameter table.
    pub fn capture(params: &EngineParams) -> Self {
        let mut state = Self::new();
        for (key, value) in params.iter() {
            state.values[key.index()] = value;
        }
        state
    }

    /// Writes every value into a live parameter table.
    pub fn apply_to(&self, params: &EngineParams) {
        for (key, value) in self.iter() {
            params.set(key, value);
        }
        tracing::debug!("state applied to engine parameters");
    }

    /// Parse a state from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let doc: StateDocument = toml::from_str(toml_str)?;
        Ok(Self::from_document(doc))
    }

    /// Serialize the state to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.to_document())?)
    }

    /// Load a state from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let state = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "state loaded");
        Ok(state)
    }

    /// Save the state to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }

    fn from_document(doc: StateDocument) -> Self {
        let mut state = Self::new();
        state.description = doc.description;

        for (name, value) in &doc.values {
            let Some(key) = ParamKey::from_state_key(name) else {
                tracing::warn!(key = %name, "ignoring unknown state key");
                continue;
            };
            let number = match value {
                toml::Value::Float(f) => *f as f32,
                toml::Value::Integer(i) => *i as f32,
                other => {
                    tracing::warn!(
                        key = %name,
                        value = %other,
                        "non-numeric state value, using default"
                    );
                    continue;
                }
            };
            let stored = state.set(key, number);
            if stored != number {
                tracing::warn!(key = %name, value = number, clamped = stored, "state value out of range");
            }
        }

        let low = ParamKey::Global(GlobalParam::LowSplit);
        let high = ParamKey::Global(GlobalParam::HighSplit);
        if state.get(high) < state.get(low) {
            tracing::warn!(
                f0 = state.get(low),
                f1 = state.get(high),
                "high split below low split, raising it"
            );
            state.values[high.index()] = state.get(low);
        }
        state
    }

    fn to_document(&self) -> StateDocument {
        StateDocument {
            description: self.description.clone(),
            values: self
                .iter()
                .map(|(key, value)| {
                    let number = toml::Value::Float(shortest_f64(value));
                    (key.state_key().to_string(), number)
                })
                .collect(),
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Widen an `f32` so it prints with its shortest decimal form (`0.16`, not
/// `0.1599999964237213`).
fn shortest_f64(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}
