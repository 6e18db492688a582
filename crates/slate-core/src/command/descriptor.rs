// ── Mutation descriptors ──
//
// The single statement of what a command sends and which cache keys it
// can change. `affected` errs on the side of covering too much: an
// extra stale entry costs one refetch, a missed one shows wrong data.

use serde::Serialize;
use uuid::Uuid;

use slate_api::{Method, paths};

use super::Command;
use crate::error::CoreError;
use crate::key::ResourceKey;
use crate::resources::{self, all, detail, org_scope, project_scope};

/// Endpoint, method, payload, and the keys a successful call invalidates.
#[derive(Debug, Clone)]
pub struct MutationDescriptor {
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<serde_json::Value>,
    pub affected: Vec<ResourceKey>,
}

impl MutationDescriptor {
    fn new(method: Method, endpoint: String) -> Self {
        Self {
            endpoint,
            method,
            payload: None,
            affected: Vec::new(),
        }
    }

    fn body(mut self, payload: &impl Serialize) -> Result<Self, CoreError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| CoreError::Internal(format!("failed to encode request body: {e}")))?;
        self.payload = Some(value);
        Ok(self)
    }

    fn affects(mut self, key: ResourceKey) -> Self {
        self.affected.push(key);
        self
    }

    fn affects_if(self, key: Option<ResourceKey>) -> Self {
        match key {
            Some(key) => self.affects(key),
            None => self,
        }
    }
}

fn post(collection: &str) -> MutationDescriptor {
    MutationDescriptor::new(Method::POST, collection.to_owned())
}

fn patch(collection: &str, id: Uuid) -> MutationDescriptor {
    MutationDescriptor::new(Method::PATCH, paths::item(collection, id))
}

fn delete(collection: &str, id: Uuid) -> MutationDescriptor {
    MutationDescriptor::new(Method::DELETE, paths::item(collection, id))
}

impl Command {
    /// Describe this command. Fails only if the payload cannot be encoded.
    #[allow(clippy::too_many_lines)]
    pub fn descriptor(&self) -> Result<MutationDescriptor, CoreError> {
        use resources::{
            BANK_ACCOUNTS, CHARACTERS, INVITES, INVOICES, PROJECTS, SCENES, STAKEHOLDERS,
            SUPPLIERS, TEAM_MEMBERS, TRANSACTIONS,
        };

        Ok(match self {
            // ── Finance ──────────────────────────────────────────────
            Self::CreateInvoice(req) => post(paths::INVOICES)
                .body(req)?
                .affects(org_scope(INVOICES, req.organization_id)),
            Self::UpdateInvoice { id, update } => {
                patch(paths::INVOICES, *id).body(update)?.affects(all(INVOICES))
            }
            Self::DeleteInvoice { id } => delete(paths::INVOICES, *id)
                .affects(all(INVOICES))
                .affects(all(TRANSACTIONS)),

            // A transaction moves a bank balance and may settle an invoice.
            Self::CreateTransaction(req) => post(paths::TRANSACTIONS)
                .body(req)?
                .affects(org_scope(TRANSACTIONS, req.organization_id))
                .affects(org_scope(BANK_ACCOUNTS, req.organization_id))
                // No account given: any account's detail may change.
                .affects(
                    req.bank_account_id
                        .map_or_else(|| all(BANK_ACCOUNTS), |a| detail(BANK_ACCOUNTS, a)),
                )
                .affects_if(req.invoice_id.map(|_| org_scope(INVOICES, req.organization_id)))
                .affects_if(req.invoice_id.map(|i| detail(INVOICES, i))),
            Self::DeleteTransaction { id } => delete(paths::TRANSACTIONS, *id)
                .affects(all(TRANSACTIONS))
                .affects(all(BANK_ACCOUNTS))
                .affects(all(INVOICES)),

            // ── Team ─────────────────────────────────────────────────
            Self::UpdateTeamMember { id, update } => patch(paths::TEAM_MEMBERS, *id)
                .body(update)?
                .affects(all(TEAM_MEMBERS)),
            Self::RemoveTeamMember { id } => {
                delete(paths::TEAM_MEMBERS, *id).affects(all(TEAM_MEMBERS))
            }
            Self::CreateInvite(req) => post(paths::INVITES)
                .body(req)?
                .affects(org_scope(INVITES, req.organization_id)),
            Self::ResendInvite { id } => {
                MutationDescriptor::new(Method::POST, paths::invite_resend(*id))
                    .affects(all(INVITES))
            }
            Self::RevokeInvite { id } => delete(paths::INVITES, *id).affects(all(INVITES)),

            // ── Production ───────────────────────────────────────────
            Self::CreateProject(req) => post(paths::PROJECTS)
                .body(req)?
                .affects(org_scope(PROJECTS, req.organization_id)),
            Self::UpdateProject { id, update } => {
                patch(paths::PROJECTS, *id).body(update)?.affects(all(PROJECTS))
            }
            Self::DeleteProject { id } => delete(paths::PROJECTS, *id)
                .affects(all(PROJECTS))
                .affects(project_scope(SCENES, *id))
                .affects(project_scope(CHARACTERS, *id)),
            Self::CreateScene(req) => post(paths::SCENES)
                .body(req)?
                .affects(project_scope(SCENES, req.project_id)),
            Self::UpdateScene { id, update } => {
                patch(paths::SCENES, *id).body(update)?.affects(all(SCENES))
            }
            Self::DeleteScene { id } => delete(paths::SCENES, *id).affects(all(SCENES)),
            Self::CreateCharacter(req) => post(paths::CHARACTERS)
                .body(req)?
                .affects(project_scope(CHARACTERS, req.project_id)),
            Self::UpdateCharacter { id, update } => {
                patch(paths::CHARACTERS, *id).body(update)?.affects(all(CHARACTERS))
            }
            // Scenes list their characters.
            Self::DeleteCharacter { id } => delete(paths::CHARACTERS, *id)
                .affects(all(CHARACTERS))
                .affects(all(SCENES)),

            // ── Contacts ─────────────────────────────────────────────
            Self::CreateStakeholder(req) => post(paths::STAKEHOLDERS)
                .body(req)?
                .affects(org_scope(STAKEHOLDERS, req.organization_id)),
            Self::UpdateStakeholder { id, update } => patch(paths::STAKEHOLDERS, *id)
                .body(update)?
                .affects(all(STAKEHOLDERS)),
            Self::DeleteStakeholder { id } => {
                delete(paths::STAKEHOLDERS, *id).affects(all(STAKEHOLDERS))
            }
            Self::CreateSupplier(req) => post(paths::SUPPLIERS)
                .body(req)?
                .affects(org_scope(SUPPLIERS, req.organization_id)),
            Self::UpdateSupplier { id, update } => patch(paths::SUPPLIERS, *id)
                .body(update)?
                .affects(all(SUPPLIERS)),
            Self::DeleteSupplier { id } => delete(paths::SUPPLIERS, *id)
                .affects(all(SUPPLIERS))
                .affects(all(INVOICES)),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slate_api::{Cents, CreateTransactionRequest, TransactionFilter, TransactionKind};

    use super::*;

    fn income(org: Uuid, account: Option<Uuid>) -> Command {
        Command::CreateTransaction(CreateTransactionRequest {
            organization_id: org,
            kind: TransactionKind::Income,
            amount_cents: Cents(10_000),
            bank_account_id: account,
            invoice_id: None,
            project_id: None,
            description: None,
            occurred_on: None,
        })
    }

    #[test]
    fn create_transaction_affects_transactions_and_balances() {
        let org = Uuid::new_v4();
        let account = Uuid::new_v4();
        let d = income(org, Some(account)).descriptor().unwrap();

        assert_eq!(d.method, Method::POST);
        assert_eq!(d.endpoint, "transactions");
        assert_eq!(d.payload.as_ref().unwrap()["type"], "income");

        let covered = |key: &ResourceKey| d.affected.iter().any(|a| a.covers(key));
        assert!(covered(&resources::transactions(
            org,
            &TransactionFilter {
                kind: Some(TransactionKind::Expense),
                ..TransactionFilter::default()
            }
        )));
        assert!(covered(&org_scope(resources::BANK_ACCOUNTS, org)));
        assert!(covered(&detail(resources::BANK_ACCOUNTS, account)));
        assert!(!covered(&org_scope(resources::BANK_ACCOUNTS, Uuid::new_v4())));
        assert!(!covered(&org_scope(resources::INVOICES, org)));

        // Unknown account: every balance detail is affected.
        let d = income(org, None).descriptor().unwrap();
        let covered = |key: &ResourceKey| d.affected.iter().any(|a| a.covers(key));
        assert!(covered(&detail(resources::BANK_ACCOUNTS, Uuid::new_v4())));
        assert!(covered(&org_scope(resources::BANK_ACCOUNTS, org)));
    }

    #[test]
    fn resend_invite_has_no_body() {
        let id = Uuid::new_v4();
        let d = Command::ResendInvite { id }.descriptor().unwrap();

        assert_eq!(d.method, Method::POST);
        assert_eq!(d.endpoint, format!("invites/{id}/resend"));
        assert!(d.payload.is_none());
        assert!(d.affected.iter().any(|a| a.covers(&resources::invites(Uuid::new_v4(), None))));
    }

    #[test]
    fn every_delete_invalidates_its_resource() {
        let id = Uuid::new_v4();
        let cases = [
            (Command::DeleteInvoice { id }, resources::INVOICES),
            (Command::DeleteTransaction { id }, resources::TRANSACTIONS),
            (Command::RemoveTeamMember { id }, resources::TEAM_MEMBERS),
            (Command::RevokeInvite { id }, resources::INVITES),
            (Command::DeleteProject { id }, resources::PROJECTS),
            (Command::DeleteScene { id }, resources::SCENES),
            (Command::DeleteCharacter { id }, resources::CHARACTERS),
            (Command::DeleteStakeholder { id }, resources::STAKEHOLDERS),
            (Command::DeleteSupplier { id }, resources::SUPPLIERS),
        ];

        for (cmd, resource) in cases {
            let d = cmd.descriptor().unwrap();
            assert_eq!(d.method, Method::DELETE, "{}", cmd.name());
            assert!(
                d.affected.iter().any(|a| a.covers(&detail(resource, id))),
                "{} must cover its detail key",
                cmd.name()
            );
        }
    }
}
