//! Scene command handlers.

use tabled::Tabled;

use slate_core::{CreateSceneRequest, Scene, Slate};

use crate::cli::{GlobalOpts, ScenesArgs, ScenesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SceneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Cast")]
    cast: usize,
}

impl From<&Scene> for SceneRow {
    fn from(s: &Scene) -> Self {
        Self {
            id: s.id.to_string(),
            number: s.number.clone(),
            title: s.title.clone(),
            location: s.location.clone().unwrap_or_default(),
            cast: s.character_ids.len(),
        }
    }
}

pub async fn handle(slate: &Slate, args: ScenesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ScenesCommand::List { project } => {
            let scenes = util::fetch(&slate.scenes(Some(project))).await?;
            let out = output::render_list(
                &global.output,
                scenes.as_slice(),
                |s| SceneRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScenesCommand::Create {
            project,
            number,
            title,
            location,
        } => {
            let scene = slate
                .create_scene(CreateSceneRequest {
                    project_id: project,
                    number,
                    title,
                    location,
                    description: None,
                })
                .await?;
            output::success(global, &format!("Scene {} added", scene.number));
            output::print_output(&scene.id.to_string(), global.quiet);
            Ok(())
        }

        ScenesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete scene {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_scene(id).await?;
            output::success(global, "Scene deleted");
            Ok(())
        }
    }
}
