//! Invite command handlers.

use tabled::Tabled;

use slate_core::{CreateInviteRequest, Invite, Slate};

use crate::cli::{GlobalOpts, InvitesArgs, InvitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct InviteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&Invite> for InviteRow {
    fn from(i: &Invite) -> Self {
        Self {
            id: i.id.to_string(),
            email: i.email.clone(),
            role: i.role.to_string(),
            status: i.status.to_string(),
            expires: i
                .expires_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn handle(slate: &Slate, args: InvitesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InvitesCommand::List { status } => {
            let invites = util::fetch(&slate.invites(slate.organization_id(), status)).await?;
            let out = output::render_list(
                &global.output,
                invites.as_slice(),
                |i| InviteRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InvitesCommand::Create { email, role } => {
            let invite = slate
                .create_invite(CreateInviteRequest {
                    organization_id: util::require_org(slate)?,
                    email,
                    role,
                })
                .await?;
            output::success(global, &format!("Invited {} as {}", invite.email, invite.role));
            if let Some(ref link) = invite.invite_link {
                output::print_output(link, global.quiet);
            }
            Ok(())
        }

        // The link is the only output so it can be piped.
        InvitesCommand::Resend { id } => {
            let link = slate.resend_invite(id).await?;
            output::success(global, "Invite re-sent");
            output::print_output(&link, global.quiet);
            Ok(())
        }

        InvitesCommand::Revoke { id } => {
            if !util::confirm(&format!("Revoke invite {id}?"), global.yes)? {
                return Ok(());
            }
            slate.revoke_invite(id).await?;
            output::success(global, "Invite revoked");
            Ok(())
        }
    }
}
