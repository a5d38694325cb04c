//! Platform-specific paths for saved states.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/mbcomp/` (Linux), `~/Library/Application Support/mbcomp/` (macOS), `%APPDATA%\mbcomp\` (Windows)
//! - **User states**: `states/` under the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use mbcomp_config::paths;
//!
//! let states_dir = paths::user_states_dir();
//! println!("User states: {:?}", states_dir);
//!
//! if let Some(path) = paths::find_state("drum_bus") {
//!     println!("Found state at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "mbcomp";

/// Subdirectory name for saved states.
const STATES_SUBDIR: &str = "states";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific states directory.
pub fn user_states_dir() -> PathBuf {
    user_config_dir().join(STATES_SUBDIR)
}

/// Find a state file by name.
///
/// `name` may be a path to an existing file, or a state name (with or
/// without `.toml`) looked up in the user states directory.
pub fn find_state(name: &str) -> Option<PathBuf> {
    find_state_in(name, &user_states_dir())
}

fn find_state_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Ensure the user states directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_states_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_states_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
        tracing::info!(path = %dir.display(), "created states directory");
    }

    Ok(dir)
}

/// List the `.toml` files in `dir`, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_states_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut states: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    states.sort();
    states
}

/// Get the state name from a file path.
///
/// ```rust
/// use mbcomp_config::paths::state_name_from_path;
/// use std::path::Path;
///
/// let name = state_name_from_path(Path::new("/path/to/drum_bus.toml"));
/// assert_eq!(name, Some("drum_bus".to_string()));
/// ```
pub fn state_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_dirs() {
        assert!(user_config_dir().to_string_lossy().contains("mbcomp"));
        assert!(user_states_dir().ends_with("mbcomp/states"));
    }

    #[test]
    fn test_find_state_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.toml");
        fs::write(&path, "la = 5.0").unwrap();

        assert_eq!(find_state(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn test_find_state_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocal.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(find_state_in("vocal", temp_dir.path()), Some(path.clone()));
        assert_eq!(find_state_in("vocal.toml", temp_dir.path()), Some(path));
        assert_eq!(find_state_in("missing", temp_dir.path()), None);
    }

    #[test]
    fn test_list_states_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let states = list_states_in_dir(temp_dir.path());
        let names: Vec<_> = states
            .iter()
            .filter_map(|p| state_name_from_path(p))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_list_states_nonexistent_dir() {
        assert!(list_states_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
