// ── Resource names and key builders ──
//
// Queries and mutation descriptors both build their keys here, so a
// list a mutation invalidates is always the list a query cached.

use uuid::Uuid;

use slate_api::{InviteStatus, InvoiceFilter, TransactionFilter};

use crate::key::ResourceKey;

pub const INVOICES: &str = "invoices";
pub const TRANSACTIONS: &str = "transactions";
pub const BANK_ACCOUNTS: &str = "bank_accounts";
pub const TEAM_MEMBERS: &str = "team_members";
pub const INVITES: &str = "invites";
pub const PROJECTS: &str = "projects";
pub const SCENES: &str = "scenes";
pub const CHARACTERS: &str = "characters";
pub const STAKEHOLDERS: &str = "stakeholders";
pub const SUPPLIERS: &str = "suppliers";

/// Every resource the cache knows about.
pub const ALL: [&str; 10] = [
    INVOICES,
    TRANSACTIONS,
    BANK_ACCOUNTS,
    TEAM_MEMBERS,
    INVITES,
    PROJECTS,
    SCENES,
    CHARACTERS,
    STAKEHOLDERS,
    SUPPLIERS,
];

// ── Generic shapes ───────────────────────────────────────────────────

/// Every key of a resource (lists and details alike).
pub fn all(resource: &str) -> ResourceKey {
    ResourceKey::new(resource)
}

/// All lists of a resource within one organization.
pub fn org_scope(resource: &str, org: Uuid) -> ResourceKey {
    ResourceKey::new(resource).param("organization_id", org)
}

/// All lists of a resource within one project.
pub fn project_scope(resource: &str, project_id: Uuid) -> ResourceKey {
    ResourceKey::new(resource).param("project_id", project_id)
}

/// A single record.
pub fn detail(resource: &str, id: Uuid) -> ResourceKey {
    ResourceKey::new(resource).param("id", id)
}

// ── Per-resource lists ───────────────────────────────────────────────

pub fn invoices(org: Uuid, filter: &InvoiceFilter) -> ResourceKey {
    org_scope(INVOICES, org).params_from(filter)
}

pub fn transactions(org: Uuid, filter: &TransactionFilter) -> ResourceKey {
    org_scope(TRANSACTIONS, org).params_from(filter)
}

pub fn invites(org: Uuid, status: Option<InviteStatus>) -> ResourceKey {
    org_scope(INVITES, org).param("status", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_cover_their_lists() {
        let org = Uuid::new_v4();
        let list = invoices(
            org,
            &InvoiceFilter {
                status: Some(slate_api::InvoiceStatus::Paid),
                ..InvoiceFilter::default()
            },
        );

        assert!(all(INVOICES).covers(&list));
        assert!(org_scope(INVOICES, org).covers(&list));
        assert!(all(INVOICES).covers(&detail(INVOICES, Uuid::new_v4())));
        assert!(!org_scope(INVOICES, Uuid::new_v4()).covers(&list));
    }

    #[test]
    fn empty_filter_equals_scope() {
        let org = Uuid::new_v4();
        assert_eq!(
            transactions(org, &TransactionFilter::default()),
            org_scope(TRANSACTIONS, org)
        );
        assert_eq!(invites(org, None), org_scope(INVITES, org));
    }
}
