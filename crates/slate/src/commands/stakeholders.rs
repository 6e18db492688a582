//! Stakeholder command handlers.

use tabled::Tabled;

use slate_core::{CreateStakeholderRequest, Slate, Stakeholder};

use crate::cli::{GlobalOpts, StakeholdersArgs, StakeholdersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct StakeholderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&Stakeholder> for StakeholderRow {
    fn from(s: &Stakeholder) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            company: s.company.clone().unwrap_or_default(),
            role: s.role.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    slate: &Slate,
    args: StakeholdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StakeholdersCommand::List => {
            let stakeholders = util::fetch(&slate.stakeholders(slate.organization_id())).await?;
            let out = output::render_list(
                &global.output,
                stakeholders.as_slice(),
                |s| StakeholderRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StakeholdersCommand::Create {
            name,
            email,
            company,
            role,
        } => {
            let stakeholder = slate
                .create_stakeholder(CreateStakeholderRequest {
                    organization_id: util::require_org(slate)?,
                    name,
                    email,
                    company,
                    role,
                })
                .await?;
            output::success(global, &format!("Stakeholder '{}' added", stakeholder.name));
            output::print_output(&stakeholder.id.to_string(), global.quiet);
            Ok(())
        }

        StakeholdersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete stakeholder {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_stakeholder(id).await?;
            output::success(global, "Stakeholder deleted");
            Ok(())
        }
    }
}
