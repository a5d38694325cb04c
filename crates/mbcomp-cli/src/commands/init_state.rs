//! Default state file generation.

use clap::Args;
use mbcomp_config::{EngineState, paths};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitStateArgs {
    /// Output TOML file; a bare name is placed in the user states directory
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Description stored in the file
    #[arg(short, long)]
    description: Option<String>,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

pub fn run(args: InitStateArgs) -> anyhow::Result<()> {
    let path = resolve_path(args.file)?;

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut state = EngineState::new();
    if let Some(description) = args.description {
        state = state.with_description(description);
    }
    state.save(&path)?;
    println!("Wrote default state to {}", path.display());

    Ok(())
}

/// A bare name without extension goes to the user states directory.
fn resolve_path(file: PathBuf) -> anyhow::Result<PathBuf> {
    let is_bare_name = file.extension().is_none() && file.components().count() == 1;
    if is_bare_name {
        let dir = paths::ensure_user_states_dir()?;
        Ok(dir.join(file).with_extension("toml"))
    } else {
        Ok(file)
    }
}
