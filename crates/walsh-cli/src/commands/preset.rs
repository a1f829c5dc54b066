//! Preset commands.

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use walsh_io::Preset;

#[derive(Args)]
pub struct PresetArgs {
    #[command(subcommand)]
    command: PresetCommand,
}

#[derive(Subcommand)]
enum PresetCommand {
    /// Print a preset (or the defaults) as TOML
    Show {
        /// Preset file; defaults are shown when omitted
        file: Option<PathBuf>,
    },

    /// Write the default preset to a new file
    Init {
        /// Destination file
        file: PathBuf,

        /// Name stored in the preset
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetArgs) -> anyhow::Result<()> {
    match args.command {
        PresetCommand::Show { file } => {
            let preset = match &file {
                Some(path) => Preset::load(path)
                    .with_context(|| format!("loading preset {}", path.display()))?,
                None => Preset::defaults(),
            };
            print!("{}", preset.to_toml()?);
        }

        PresetCommand::Init { file, name, force } => {
            if file.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                );
            }
            let mut preset = Preset::defaults();
            if let Some(name) = name {
                preset.name = name;
            }
            preset.save(&file)?;
            println!("Wrote {}", file.display());
        }
    }

    Ok(())
}
