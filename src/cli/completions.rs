//! `cachette completions` - generate shell completions.

use std::io;

use clap::CommandFactory;

use super::Cli;
use crate::error::Result;

pub fn execute(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "cachette", &mut io::stdout());
    Ok(())
}
