//! Saved state listing.

use clap::Args;
use mbcomp_config::{EngineState, paths};
use std::path::PathBuf;

#[derive(Args)]
pub struct StatesArgs {
    /// Directory to list instead of the user states directory
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

pub fn run(args: StatesArgs) -> anyhow::Result<()> {
    let dir = args.dir.unwrap_or_else(paths::user_states_dir);
    let states = paths::list_states_in_dir(&dir);

    println!("States in {}:", dir.display());
    if states.is_empty() {
        println!("  (none)");
        println!();
        println!("  Create one with: mbcomp init-state <name>");
        return Ok(());
    }

    for path in states {
        let name = paths::state_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
        match EngineState::load(&path) {
            Ok(state) => {
                let desc = state.description.as_deref().unwrap_or("");
                println!("  {:20} - {}", name, desc);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "state failed to load");
                println!("  {:20} - (error loading)", name);
            }
        }
    }

    Ok(())
}
