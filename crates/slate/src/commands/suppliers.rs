//! Supplier command handlers.

use tabled::Tabled;

use slate_core::{CreateSupplierRequest, Slate, Supplier};

use crate::cli::{GlobalOpts, SuppliersArgs, SuppliersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SupplierRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&Supplier> for SupplierRow {
    fn from(s: &Supplier) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            category: s.category.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    slate: &Slate,
    args: SuppliersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SuppliersCommand::List => {
            let suppliers = util::fetch(&slate.suppliers(slate.organization_id())).await?;
            let out = output::render_list(
                &global.output,
                suppliers.as_slice(),
                |s| SupplierRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SuppliersCommand::Create {
            name,
            email,
            phone,
            category,
        } => {
            let supplier = slate
                .create_supplier(CreateSupplierRequest {
                    organization_id: util::require_org(slate)?,
                    name,
                    email,
                    phone,
                    category,
                })
                .await?;
            output::success(global, &format!("Supplier '{}' added", supplier.name));
            output::print_output(&supplier.id.to_string(), global.quiet);
            Ok(())
        }

        SuppliersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete supplier {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_supplier(id).await?;
            output::success(global, "Supplier deleted");
            Ok(())
        }
    }
}
