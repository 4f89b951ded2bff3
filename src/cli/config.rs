//! `donezo config` command implementation

use anyhow::{bail, Result};
use clap::Args;

use crate::config::{config_path, save_config, Config};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write a config.toml with every default filled in
    #[arg(long)]
    init: bool,

    /// Overwrite an existing config.toml
    #[arg(long, requires = "init")]
    force: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let path = config_path()?;

    if args.init {
        if path.exists() && !args.force {
            bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        save_config(&Config::default())?;
        println!("✓ Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
