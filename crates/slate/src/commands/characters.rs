//! Character command handlers.

use tabled::Tabled;

use slate_core::{Character, CreateCharacterRequest, Slate};

use crate::cli::{CharactersArgs, CharactersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CharacterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Actor")]
    actor: String,
}

impl From<&Character> for CharacterRow {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            actor: c.actor.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    slate: &Slate,
    args: CharactersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CharactersCommand::List { project } => {
            let characters = util::fetch(&slate.characters(Some(project))).await?;
            let out = output::render_list(
                &global.output,
                characters.as_slice(),
                |c| CharacterRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CharactersCommand::Create {
            project,
            name,
            actor,
        } => {
            let character = slate
                .create_character(CreateCharacterRequest {
                    project_id: project,
                    name,
                    description: None,
                    actor,
                })
                .await?;
            output::success(global, &format!("Character '{}' added", character.name));
            output::print_output(&character.id.to_string(), global.quiet);
            Ok(())
        }

        CharactersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete character {id}?"), global.yes)? {
                return Ok(());
            }
            slate.delete_character(id).await?;
            output::success(global, "Character deleted");
            Ok(())
        }
    }
}
