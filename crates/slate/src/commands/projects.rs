//! Project command handlers.

use tabled::Tabled;

use slate_core::{CreateProjectRequest, Project, Slate, UpdateProjectRequest};

use crate::cli::{GlobalOpts, ProjectsArgs, ProjectsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Start")]
    start: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            status: p.status.to_string(),
            budget: p.budget_cents.map(output::money).unwrap_or_default(),
            start: output::opt(p.start_date.as_ref()),
        }
    }
}

fn detail(p: &Project) -> String {
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Status", p.status.to_string()),
        ("Budget", p.budget_cents.map(output::money).unwrap_or_default()),
        ("Start", output::opt(p.start_date.as_ref())),
        ("End", output::opt(p.end_date.as_ref())),
        ("Description", p.description.clone().unwrap_or_default()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(slate: &Slate, args: ProjectsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProjectsCommand::List => {
            let projects = util::fetch(&slate.projects(slate.organization_id())).await?;
            let out = output::render_list(
                &global.output,
                projects.as_slice(),
                |p| ProjectRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Get { id } => {
            let project = util::fetch(&slate.project(Some(id))).await?;
            let out = output::render_single(&global.output, project.as_ref(), detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Create {
            name,
            status,
            description,
            budget,
        } => {
            let project = slate
                .create_project(CreateProjectRequest {
                    organization_id: util::require_org(slate)?,
                    name,
                    status,
                    description,
                    budget_cents: budget,
                })
                .await?;
            output::success(global, &format!("Project '{}' created", project.name));
            output::print_output(&project.id.to_string(), global.quiet);
            Ok(())
        }

        ProjectsCommand::Update {
            id,
            name,
            status,
            description,
            budget,
        } => {
            let project = slate
                .update_project(
                    id,
                    UpdateProjectRequest {
                        name,
                        status,
                        description,
                        budget_cents: budget,
                    },
                )
                .await?;
            output::success(global, &format!("Project '{}' updated", project.name));
            Ok(())
        }

        ProjectsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete project {id} with all its scenes and characters?"),
                global.yes,
            )? {
                return Ok(());
            }
            slate.delete_project(id).await?;
            output::success(global, "Project deleted");
            Ok(())
        }
    }
}
