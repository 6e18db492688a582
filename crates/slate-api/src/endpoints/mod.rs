// Typed read endpoints, grouped by domain.
//
// Each submodule adds inherent list/get methods to `ApiClient`. Writes
// are addressed through `paths` by the mutation layer above.

mod contacts;
mod finance;
mod production;
mod team;

use serde::Serialize;

/// Flatten a filter struct into query parameters.
///
/// `None` fields are skipped (filters use `skip_serializing_if`); strings
/// are passed through unquoted, everything else in its JSON form.
pub fn filter_params<F: Serialize>(filter: &F) -> Vec<(String, String)> {
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(filter) else {
        return Vec::new();
    };
    map.into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

/// Resource paths, relative to the API base URL.
pub mod paths {
    use uuid::Uuid;

    pub const INVOICES: &str = "invoices";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BANK_ACCOUNTS: &str = "bank-accounts";
    pub const TEAM_MEMBERS: &str = "team-members";
    pub const INVITES: &str = "invites";
    pub const PROJECTS: &str = "projects";
    pub const SCENES: &str = "scenes";
    pub const CHARACTERS: &str = "characters";
    pub const STAKEHOLDERS: &str = "stakeholders";
    pub const SUPPLIERS: &str = "suppliers";

    /// `{collection}/{id}`
    pub fn item(collection: &str, id: Uuid) -> String {
        format!("{collection}/{id}")
    }

    pub fn invite_resend(id: Uuid) -> String {
        format!("{INVITES}/{id}/resend")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn filter_params_skip_nulls_and_unquote_strings() {
        let mut params = filter_params(&json!({
            "status": "paid",
            "project_id": null,
            "limit": 20
        }));
        params.sort();
        assert_eq!(
            params,
            vec![
                ("limit".to_owned(), "20".to_owned()),
                ("status".to_owned(), "paid".to_owned()),
            ]
        );
    }

    #[test]
    fn item_paths() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            paths::item(paths::BANK_ACCOUNTS, id),
            format!("bank-accounts/{id}")
        );
        assert_eq!(paths::invite_resend(id), format!("invites/{id}/resend"));
    }
}
