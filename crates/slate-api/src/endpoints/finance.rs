// Finance endpoints: invoices, transactions, bank accounts.
//
// Every list is organization-scoped via the `organization_id` query
// parameter; filters are appended as further parameters.

use tracing::debug;
use uuid::Uuid;

use super::{filter_params, paths};
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{BankAccount, Invoice, InvoiceFilter, Transaction, TransactionFilter};

fn org_params<F: serde::Serialize>(org: Uuid, filter: &F) -> Vec<(String, String)> {
    let mut params = vec![("organization_id".to_owned(), org.to_string())];
    params.extend(filter_params(filter));
    params
}

impl ApiClient {
    // ── Invoices ─────────────────────────────────────────────────────

    /// `GET /invoices?organization_id=..&status=..`
    pub async fn list_invoices(
        &self,
        org: Uuid,
        filter: &InvoiceFilter,
    ) -> Result<Vec<Invoice>, Error> {
        debug!(%org, "listing invoices");
        self.get_with_params(paths::INVOICES, &org_params(org, filter))
            .await
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, Error> {
        self.get(&paths::item(paths::INVOICES, id)).await
    }

    // ── Transactions ─────────────────────────────────────────────────

    pub async fn list_transactions(
        &self,
        org: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        debug!(%org, "listing transactions");
        self.get_with_params(paths::TRANSACTIONS, &org_params(org, filter))
            .await
    }

    // ── Bank accounts ────────────────────────────────────────────────

    pub async fn list_bank_accounts(&self, org: Uuid) -> Result<Vec<BankAccount>, Error> {
        self.get_with_params(paths::BANK_ACCOUNTS, &org_params(org, &()))
            .await
    }

    pub async fn get_bank_account(&self, id: Uuid) -> Result<BankAccount, Error> {
        self.get(&paths::item(paths::BANK_ACCOUNTS, id)).await
    }
}
