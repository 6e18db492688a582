//! Team member command handlers.

use tabled::Tabled;

use slate_core::{Slate, TeamMember, UpdateTeamMemberRequest};

use crate::cli::{GlobalOpts, TeamArgs, TeamCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

impl From<&TeamMember> for MemberRow {
    fn from(m: &TeamMember) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name.clone().unwrap_or_default(),
            email: m.email.clone(),
            role: m.role.to_string(),
            joined: m
                .joined_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(slate: &Slate, args: TeamArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TeamCommand::List => {
            let members = util::fetch(&slate.team_members(slate.organization_id())).await?;
            let out = output::render_list(
                &global.output,
                members.as_slice(),
                |m| MemberRow::from(m),
                |m| m.email.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TeamCommand::SetRole { id, role } => {
            let member = slate
                .update_team_member(id, UpdateTeamMemberRequest { role })
                .await?;
            output::success(global, &format!("{} is now {}", member.email, member.role));
            Ok(())
        }

        TeamCommand::Remove { id } => {
            if !util::confirm(
                &format!("Remove team member {id} from the organization?"),
                global.yes,
            )? {
                return Ok(());
            }
            slate.remove_team_member(id).await?;
            output::success(global, "Team member removed");
            Ok(())
        }
    }
}
