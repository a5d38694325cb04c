//! Persisted state for the mbcomp three-band compressor.
//!
//! A state is the flat key-per-band map of every parameter value (`CTLow`,
//! `rtMaster`, `la`, `f0`, ...) stored as TOML. Restoring never fails on
//! content: missing or unknown keys and bad values fall back to defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use mbcomp_config::{EngineState, paths};
//! use mbcomp_engine::Engine;
//!
//! let engine = Engine::new();
//! let state = EngineState::load("drum_bus.toml")?;
//! state.apply_to(&engine.params());
//!
//! // Save the current settings to the user states directory
//! let dir = paths::ensure_user_states_dir()?;
//! EngineState::capture(&engine.params()).save(dir.join("current.toml"))?;
//! # Ok::<(), mbcomp_config::ConfigError>(())
//! ```

mod error;
mod state;

/// Platform-specific paths for saved states.
pub mod paths;

pub use error::ConfigError;
pub use paths::{find_state, user_config_dir, user_states_dir};
pub use state::EngineState;

/// Load a state by path or by name from the user states directory.
pub fn load_named_state(name: &str) -> Result<EngineState, ConfigError> {
    let path = find_state(name).ok_or_else(|| ConfigError::StateNotFound(name.to_string()))?;
    EngineState::load(path)
}
