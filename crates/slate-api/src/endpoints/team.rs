// Team endpoints: members and invites.

use uuid::Uuid;

use super::paths;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Invite, InviteStatus, TeamMember};

impl ApiClient {
    pub async fn list_team_members(&self, org: Uuid) -> Result<Vec<TeamMember>, Error> {
        let params = [("organization_id".to_owned(), org.to_string())];
        self.get_with_params(paths::TEAM_MEMBERS, &params).await
    }

    /// `GET /invites?organization_id=..[&status=..]`
    pub async fn list_invites(
        &self,
        org: Uuid,
        status: Option<InviteStatus>,
    ) -> Result<Vec<Invite>, Error> {
        let mut params = vec![("organization_id".to_owned(), org.to_string())];
        if let Some(status) = status {
            params.push(("status".to_owned(), status.to_string()));
        }
        self.get_with_params(paths::INVITES, &params).await
    }
}
