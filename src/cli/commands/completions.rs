//! Shell completion scripts for `udyam`
//!
//! Every shell `clap_complete` knows is accepted (bash, zsh, fish, elvish,
//! PowerShell). Typical installs:
//!
//! ```bash
//! source <(udyam completions bash)          # ~/.bashrc
//! source <(udyam completions zsh)           # ~/.zshrc
//! udyam completions fish > ~/.config/fish/completions/udyam.fish
//! udyam completions powershell >> $PROFILE
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    tracing::debug!(shell = %args.shell, "generating completions");
    generate(args.shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}
