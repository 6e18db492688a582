// ── Query constructors ──
//
// One method per readable resource. Scoping parameters are `Option`s:
// a missing organization or project yields a disabled query that never
// calls the backend.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use uuid::Uuid;

use slate_api::{
    ApiClient, BankAccount, Character, Invite, InviteStatus, Invoice, InvoiceFilter, Project,
    Scene, Stakeholder, Supplier, TeamMember, Transaction, TransactionFilter,
};

use crate::cache::{Fetcher, QueryData};
use crate::error::CoreError;
use crate::key::ResourceKey;
use crate::query::Query;
use crate::resources::{self, detail, org_scope, project_scope};
use crate::slate::Slate;

impl Slate {
    /// Bind a key to a fetch function.
    fn bind<T, F, Fut>(&self, key: ResourceKey, fetch: F) -> Query<T>
    where
        T: Any + Send + Sync,
        F: Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, slate_api::Error>> + Send + 'static,
    {
        let api = Arc::clone(self.api());
        let fetcher: Fetcher = Arc::new(move || {
            let request = fetch(Arc::clone(&api));
            async move {
                let value = request.await?;
                Ok::<QueryData, CoreError>(Arc::new(value))
            }
            .boxed()
        });
        Query::new(Arc::clone(self.cache()), key, fetcher)
    }

    fn disabled<T: Any + Send + Sync>(&self) -> Query<T> {
        Query::disabled(Arc::clone(self.cache()))
    }

    // ── Finance ──────────────────────────────────────────────────────

    pub fn invoices(&self, org: Option<Uuid>, filter: InvoiceFilter) -> Query<Vec<Invoice>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(resources::invoices(org, &filter), move |api| {
            let filter = filter.clone();
            async move { api.list_invoices(org, &filter).await }
        })
    }

    pub fn invoice(&self, id: Option<Uuid>) -> Query<Invoice> {
        let Some(id) = id else {
            return self.disabled();
        };
        self.bind(detail(resources::INVOICES, id), move |api| async move {
            api.get_invoice(id).await
        })
    }

    pub fn transactions(
        &self,
        org: Option<Uuid>,
        filter: TransactionFilter,
    ) -> Query<Vec<Transaction>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(resources::transactions(org, &filter), move |api| {
            let filter = filter.clone();
            async move { api.list_transactions(org, &filter).await }
        })
    }

    pub fn bank_accounts(&self, org: Option<Uuid>) -> Query<Vec<BankAccount>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(org_scope(resources::BANK_ACCOUNTS, org), move |api| async move {
            api.list_bank_accounts(org).await
        })
    }

    pub fn bank_account(&self, id: Option<Uuid>) -> Query<BankAccount> {
        let Some(id) = id else {
            return self.disabled();
        };
        self.bind(detail(resources::BANK_ACCOUNTS, id), move |api| async move {
            api.get_bank_account(id).await
        })
    }

    // ── Team ─────────────────────────────────────────────────────────

    pub fn team_members(&self, org: Option<Uuid>) -> Query<Vec<TeamMember>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(org_scope(resources::TEAM_MEMBERS, org), move |api| async move {
            api.list_team_members(org).await
        })
    }

    pub fn invites(&self, org: Option<Uuid>, status: Option<InviteStatus>) -> Query<Vec<Invite>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(resources::invites(org, status), move |api| async move {
            api.list_invites(org, status).await
        })
    }

    // ── Production ───────────────────────────────────────────────────

    pub fn projects(&self, org: Option<Uuid>) -> Query<Vec<Project>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(org_scope(resources::PROJECTS, org), move |api| async move {
            api.list_projects(org).await
        })
    }

    pub fn project(&self, id: Option<Uuid>) -> Query<Project> {
        let Some(id) = id else {
            return self.disabled();
        };
        self.bind(detail(resources::PROJECTS, id), move |api| async move {
            api.get_project(id).await
        })
    }

    pub fn scenes(&self, project_id: Option<Uuid>) -> Query<Vec<Scene>> {
        let Some(project_id) = project_id else {
            return self.disabled();
        };
        self.bind(
            project_scope(resources::SCENES, project_id),
            move |api| async move { api.list_scenes(project_id).await },
        )
    }

    pub fn characters(&self, project_id: Option<Uuid>) -> Query<Vec<Character>> {
        let Some(project_id) = project_id else {
            return self.disabled();
        };
        self.bind(
            project_scope(resources::CHARACTERS, project_id),
            move |api| async move { api.list_characters(project_id).await },
        )
    }

    // ── Contacts ─────────────────────────────────────────────────────

    pub fn stakeholders(&self, org: Option<Uuid>) -> Query<Vec<Stakeholder>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(org_scope(resources::STAKEHOLDERS, org), move |api| async move {
            api.list_stakeholders(org).await
        })
    }

    pub fn suppliers(&self, org: Option<Uuid>) -> Query<Vec<Supplier>> {
        let Some(org) = org else {
            return self.disabled();
        };
        self.bind(org_scope(resources::SUPPLIERS, org), move |api| async move {
            api.list_suppliers(org).await
        })
    }
}
