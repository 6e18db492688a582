// Production endpoints: projects, scenes, characters.
//
// Projects are organization-scoped; scenes and characters hang off a
// project and are listed with `?project_id=`.

use uuid::Uuid;

use super::paths;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Character, Project, Scene};

impl ApiClient {
    pub async fn list_projects(&self, org: Uuid) -> Result<Vec<Project>, Error> {
        let params = [("organization_id".to_owned(), org.to_string())];
        self.get_with_params(paths::PROJECTS, &params).await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, Error> {
        self.get(&paths::item(paths::PROJECTS, id)).await
    }

    pub async fn list_scenes(&self, project_id: Uuid) -> Result<Vec<Scene>, Error> {
        let params = [("project_id".to_owned(), project_id.to_string())];
        self.get_with_params(paths::SCENES, &params).await
    }

    pub async fn list_characters(&self, project_id: Uuid) -> Result<Vec<Character>, Error> {
        let params = [("project_id".to_owned(), project_id.to_string())];
        self.get_with_params(paths::CHARACTERS, &params).await
    }
}
