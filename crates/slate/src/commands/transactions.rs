//! Transaction command handlers.

use tabled::Tabled;

use slate_core::{CreateTransactionRequest, Slate, Transaction, TransactionFilter};

use crate::cli::{GlobalOpts, TransactionsArgs, TransactionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            date: output::opt(tx.occurred_on.as_ref()),
            kind: tx.kind.to_string(),
            amount: output::money(tx.amount_cents),
            description: tx.description.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    slate: &Slate,
    args: TransactionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TransactionsCommand::List {
            kind,
            account,
            project,
        } => {
            let filter = TransactionFilter {
                kind,
                bank_account_id: account,
                project_id: project,
            };
            let txs = util::fetch(&slate.transactions(slate.organization_id(), filter)).await?;
            let out = output::render_list(
                &global.output,
                txs.as_slice(),
                |t| TransactionRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TransactionsCommand::Create {
            kind,
            amount,
            account,
            invoice,
            project,
            description,
            date,
        } => {
            if amount.as_i64() <= 0 {
                return Err(CliError::Validation {
                    field: "amount".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            let tx = slate
                .create_transaction(CreateTransactionRequest {
                    organization_id: util::require_org(slate)?,
                    kind,
                    amount_cents: amount,
                    bank_account_id: account,
                    invoice_id: invoice,
                    project_id: project,
                    description,
                    occurred_on: date,
                })
                .await?;
            output::success(
                global,
                &format!("Recorded {} of {}", tx.kind, output::money(tx.amount_cents)),
            );
            output::print_output(&tx.id.to_string(), global.quiet);
            Ok(())
        }

        TransactionsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete transaction {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_transaction(id).await?;
            output::success(global, "Transaction deleted");
            Ok(())
        }
    }
}
