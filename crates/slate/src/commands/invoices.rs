//! Invoice command handlers.

use tabled::Tabled;

use slate_core::{CreateInvoiceRequest, Invoice, InvoiceFilter, Slate, UpdateInvoiceRequest};

use crate::cli::{GlobalOpts, InvoicesArgs, InvoicesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(inv: &Invoice) -> Self {
        Self {
            id: inv.id.to_string(),
            number: inv.number.clone(),
            status: inv.status.to_string(),
            total: format!("{} {}", output::money(inv.total_cents), inv.currency),
            paid: output::money(inv.paid_cents),
            due: output::opt(inv.due_date.as_ref()),
        }
    }
}

fn detail(inv: &Invoice) -> String {
    let mut fields = vec![
        ("ID", inv.id.to_string()),
        ("Number", inv.number.clone()),
        ("Status", inv.status.to_string()),
        ("Currency", inv.currency.clone()),
        ("Total", output::money(inv.total_cents)),
        ("Paid", output::money(inv.paid_cents)),
        ("Issued", output::opt(inv.issue_date.as_ref())),
        ("Due", output::opt(inv.due_date.as_ref())),
        ("Project", output::opt(inv.project_id.as_ref())),
        ("Supplier", output::opt(inv.supplier_id.as_ref())),
    ];
    for item in &inv.line_items {
        fields.push((
            "Item",
            format!(
                "{} x{} @ {}",
                item.description,
                item.quantity,
                output::money(item.unit_price_cents)
            ),
        ));
    }
    output::detail_lines(&fields)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(slate: &Slate, args: InvoicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InvoicesCommand::List {
            status,
            project,
            supplier,
        } => {
            let filter = InvoiceFilter {
                status,
                project_id: project,
                supplier_id: supplier,
            };
            let invoices = util::fetch(&slate.invoices(slate.organization_id(), filter)).await?;
            let out = output::render_list(
                &global.output,
                invoices.as_slice(),
                |i| InvoiceRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InvoicesCommand::Get { id } => {
            let invoice = util::fetch(&slate.invoice(Some(id))).await?;
            let out = output::render_single(&global.output, invoice.as_ref(), detail, |i| {
                i.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InvoicesCommand::Create {
            number,
            currency,
            project,
            supplier,
            due,
            items,
        } => {
            let line_items = items
                .iter()
                .map(|raw| util::parse_line_item(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let invoice = slate
                .create_invoice(CreateInvoiceRequest {
                    organization_id: util::require_org(slate)?,
                    project_id: project,
                    supplier_id: supplier,
                    number,
                    currency,
                    issue_date: None,
                    due_date: due,
                    line_items,
                })
                .await?;
            output::success(global, &format!("Invoice {} created", invoice.number));
            output::print_output(&invoice.id.to_string(), global.quiet);
            Ok(())
        }

        InvoicesCommand::Update {
            id,
            status,
            number,
            due,
        } => {
            let update = UpdateInvoiceRequest {
                status,
                number,
                due_date: due,
                ..Default::default()
            };
            let invoice = slate.update_invoice(id, update).await?;
            output::success(global, &format!("Invoice {} updated", invoice.number));
            Ok(())
        }

        InvoicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete invoice {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_invoice(id).await?;
            output::success(global, "Invoice deleted");
            Ok(())
        }
    }
}
