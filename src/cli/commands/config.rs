//! `udyam config` command - Show configuration
//!
//! Values come from, in increasing priority: built-in defaults, the global
//! config file, `./.udyam.yaml`, and the `UDYAM_*` environment variables.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show,

    /// Show paths to configuration files
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(global),
        ConfigCommands::Path => path(),
    }
}

fn show(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    println!("submit_url: {}", config.submit_url());
    match config.schema_path() {
        Some(p) => println!("schema: {}", p.display()),
        None => println!("schema: {}", style("(built-in)").dim()),
    }
    Ok(())
}

fn path() -> Result<()> {
    let mark = |exists: bool| {
        if exists {
            style("(exists)").green().to_string()
        } else {
            style("(not found)").dim().to_string()
        }
    };

    match Config::global_config_path() {
        Some(p) => println!("global: {} {}", p.display(), mark(p.exists())),
        None => println!("global: {}", style("(no config directory)").dim()),
    }
    let local = Config::local_config_path();
    println!("local:  {} {}", local.display(), mark(local.exists()));
    Ok(())
}
