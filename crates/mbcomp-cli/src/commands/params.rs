//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use mbcomp_core::Band;
use mbcomp_engine::ParamKey;

#[derive(Args)]
pub struct ParamsArgs {
    /// Only list parameters of one band (low, mid, high or master)
    #[arg(long)]
    band: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let band = match &args.band {
        Some(name) => Some(
            Band::from_name(name).ok_or_else(|| anyhow::anyhow!("Unknown band: {}", name))?,
        ),
        None => None,
    };

    println!(
        "  {:12}  {:18}  {:>4}  {:>9}  {:>9}  {:>9}",
        "Key", "Name", "Unit", "Min", "Max", "Default"
    );
    println!(
        "  {:12}  {:18}  {:>4}  {:>9}  {:>9}  {:>9}",
        "---", "----", "----", "---", "---", "-------"
    );

    for key in ParamKey::all() {
        let shown = match (band, key) {
            (None, _) => true,
            (Some(wanted), ParamKey::Band(b, _)) => wanted == b,
            (Some(_), ParamKey::Global(_)) => false,
        };
        if !shown {
            continue;
        }

        let desc = key.descriptor();
        println!(
            "  {:12}  {:18}  {:>4}  {:>9}  {:>9}  {:>9}",
            key.state_key(),
            desc.name,
            desc.unit.suffix().trim(),
            desc.min,
            desc.max,
            desc.default
        );
    }

    println!();
    println!("Example usage:");
    println!();
    println!("  mbcomp process input.wav output.wav --set CTLow=-24 --set CRLow=4");

    Ok(())
}
