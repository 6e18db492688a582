//! Command handlers, one module per resource.

pub mod bank_accounts;
pub mod characters;
pub mod completions;
pub mod config_cmd;
pub mod invites;
pub mod invoices;
pub mod projects;
pub mod scenes;
pub mod stakeholders;
pub mod suppliers;
pub mod team;
pub mod transactions;
pub mod util;

use slate_core::Slate;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend command to its handler.
pub async fn dispatch(cmd: Command, slate: &Slate, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Invoices(args) => invoices::handle(slate, args, global).await,
        Command::Transactions(args) => transactions::handle(slate, args, global).await,
        Command::BankAccounts(args) => bank_accounts::handle(slate, args, global).await,
        Command::Team(args) => team::handle(slate, args, global).await,
        Command::Invites(args) => invites::handle(slate, args, global).await,
        Command::Projects(args) => projects::handle(slate, args, global).await,
        Command::Scenes(args) => scenes::handle(slate, args, global).await,
        Command::Characters(args) => characters::handle(slate, args, global).await,
        Command::Stakeholders(args) => stakeholders::handle(slate, args, global).await,
        Command::Suppliers(args) => suppliers::handle(slate, args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions::handle(&args);
            Ok(())
        }
    }
}
