//! Bank account command handlers (read-only).

use tabled::Tabled;

use slate_core::{BankAccount, Slate};

use crate::cli::{BankAccountsArgs, BankAccountsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct BankAccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "IBAN")]
    iban: String,
}

impl From<&BankAccount> for BankAccountRow {
    fn from(a: &BankAccount) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            balance: format!("{} {}", output::money(a.balance_cents), a.currency),
            iban: a.iban.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    slate: &Slate,
    args: BankAccountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BankAccountsCommand::List => {
            let accounts = util::fetch(&slate.bank_accounts(slate.organization_id())).await?;
            let out = output::render_list(
                &global.output,
                accounts.as_slice(),
                |a| BankAccountRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BankAccountsCommand::Get { id } => {
            let account = util::fetch(&slate.bank_account(Some(id))).await?;
            let out = output::render_single(
                &global.output,
                account.as_ref(),
                |a| {
                    output::detail_lines(&[
                        ("ID", a.id.to_string()),
                        ("Name", a.name.clone()),
                        ("Currency", a.currency.clone()),
                        ("Balance", output::money(a.balance_cents)),
                        ("IBAN", a.iban.clone().unwrap_or_default()),
                    ])
                },
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
