//! Shell completion generation.

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};

pub fn handle(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "slate", &mut std::io::stdout());
}
