// Contact endpoints: stakeholders and suppliers.

use uuid::Uuid;

use super::paths;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Stakeholder, Supplier};

impl ApiClient {
    pub async fn list_stakeholders(&self, org: Uuid) -> Result<Vec<Stakeholder>, Error> {
        let params = [("organization_id".to_owned(), org.to_string())];
        self.get_with_params(paths::STAKEHOLDERS, &params).await
    }

    pub async fn list_suppliers(&self, org: Uuid) -> Result<Vec<Supplier>, Error> {
        let params = [("organization_id".to_owned(), org.to_string())];
        self.get_with_params(paths::SUPPLIERS, &params).await
    }
}
