// ── Mutation handles and typed command shortcuts ──

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use slate_api::{
    Character, CreateCharacterRequest, CreateInviteRequest, CreateInvoiceRequest,
    CreateProjectRequest, CreateSceneRequest, CreateStakeholderRequest, CreateSupplierRequest,
    CreateTransactionRequest, Invite, Invoice, Project, Scene, Stakeholder, Supplier, TeamMember,
    Transaction, UpdateCharacterRequest, UpdateContactRequest, UpdateInvoiceRequest,
    UpdateProjectRequest, UpdateSceneRequest, UpdateTeamMemberRequest,
};

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::slate::Slate;

/// One user-facing write action (a form's submit button).
///
/// Refuses a second `invoke` while the first is still in flight, so a
/// double click cannot send the same command twice.
#[derive(Clone)]
pub struct Mutation {
    slate: Slate,
    pending: Arc<AtomicBool>,
}

/// Clears the pending flag on drop, including when the caller abandons
/// the future midway.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Mutation {
    pub(crate) fn new(slate: Slate) -> Self {
        Self {
            slate,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub async fn invoke(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if self.pending.swap(true, Ordering::AcqRel) {
            return Err(CoreError::MutationPending);
        }
        let _guard = PendingGuard(&self.pending);
        self.slate.execute(cmd).await
    }
}

// ── Typed shortcuts ──────────────────────────────────────────────────

macro_rules! expect_result {
    ($result:expr, $variant:ident) => {
        match $result {
            CommandResult::$variant(value) => Ok(value),
            other => Err(CoreError::Internal(format!(
                "unexpected command result: {other:?}"
            ))),
        }
    };
}

impl Slate {
    // ── Finance ──────────────────────────────────────────────────────

    pub async fn create_invoice(&self, req: CreateInvoiceRequest) -> Result<Invoice, CoreError> {
        expect_result!(self.execute(Command::CreateInvoice(req)).await?, Invoice)
    }

    pub async fn update_invoice(
        &self,
        id: Uuid,
        update: UpdateInvoiceRequest,
    ) -> Result<Invoice, CoreError> {
        expect_result!(
            self.execute(Command::UpdateInvoice { id, update }).await?,
            Invoice
        )
    }

    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteInvoice { id }).await.map(drop)
    }

    /// Record income or an expense. Invalidates transaction lists and
    /// the organization's bank accounts (balances move).
    pub async fn create_transaction(
        &self,
        req: CreateTransactionRequest,
    ) -> Result<Transaction, CoreError> {
        expect_result!(
            self.execute(Command::CreateTransaction(req)).await?,
            Transaction
        )
    }

    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteTransaction { id }).await.map(drop)
    }

    // ── Team ─────────────────────────────────────────────────────────

    pub async fn update_team_member(
        &self,
        id: Uuid,
        update: UpdateTeamMemberRequest,
    ) -> Result<TeamMember, CoreError> {
        expect_result!(
            self.execute(Command::UpdateTeamMember { id, update }).await?,
            TeamMember
        )
    }

    pub async fn remove_team_member(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::RemoveTeamMember { id }).await.map(drop)
    }

    pub async fn create_invite(&self, req: CreateInviteRequest) -> Result<Invite, CoreError> {
        expect_result!(self.execute(Command::CreateInvite(req)).await?, Invite)
    }

    /// Re-issue an invite; returns the new invite link.
    pub async fn resend_invite(&self, id: Uuid) -> Result<String, CoreError> {
        expect_result!(
            self.execute(Command::ResendInvite { id }).await?,
            InviteLink
        )
    }

    pub async fn revoke_invite(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::RevokeInvite { id }).await.map(drop)
    }

    // ── Production ───────────────────────────────────────────────────

    pub async fn create_project(&self, req: CreateProjectRequest) -> Result<Project, CoreError> {
        expect_result!(self.execute(Command::CreateProject(req)).await?, Project)
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        update: UpdateProjectRequest,
    ) -> Result<Project, CoreError> {
        expect_result!(
            self.execute(Command::UpdateProject { id, update }).await?,
            Project
        )
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteProject { id }).await.map(drop)
    }

    pub async fn create_scene(&self, req: CreateSceneRequest) -> Result<Scene, CoreError> {
        expect_result!(self.execute(Command::CreateScene(req)).await?, Scene)
    }

    pub async fn update_scene(
        &self,
        id: Uuid,
        update: UpdateSceneRequest,
    ) -> Result<Scene, CoreError> {
        expect_result!(
            self.execute(Command::UpdateScene { id, update }).await?,
            Scene
        )
    }

    pub async fn delete_scene(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteScene { id }).await.map(drop)
    }

    pub async fn create_character(
        &self,
        req: CreateCharacterRequest,
    ) -> Result<Character, CoreError> {
        expect_result!(
            self.execute(Command::CreateCharacter(req)).await?,
            Character
        )
    }

    pub async fn update_character(
        &self,
        id: Uuid,
        update: UpdateCharacterRequest,
    ) -> Result<Character, CoreError> {
        expect_result!(
            self.execute(Command::UpdateCharacter { id, update }).await?,
            Character
        )
    }

    pub async fn delete_character(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteCharacter { id }).await.map(drop)
    }

    // ── Contacts ─────────────────────────────────────────────────────

    pub async fn create_stakeholder(
        &self,
        req: CreateStakeholderRequest,
    ) -> Result<Stakeholder, CoreError> {
        expect_result!(
            self.execute(Command::CreateStakeholder(req)).await?,
            Stakeholder
        )
    }

    pub async fn update_stakeholder(
        &self,
        id: Uuid,
        update: UpdateContactRequest,
    ) -> Result<Stakeholder, CoreError> {
        expect_result!(
            self.execute(Command::UpdateStakeholder { id, update }).await?,
            Stakeholder
        )
    }

    pub async fn delete_stakeholder(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteStakeholder { id }).await.map(drop)
    }

    pub async fn create_supplier(&self, req: CreateSupplierRequest) -> Result<Supplier, CoreError> {
        expect_result!(self.execute(Command::CreateSupplier(req)).await?, Supplier)
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        update: UpdateContactRequest,
    ) -> Result<Supplier, CoreError> {
        expect_result!(
            self.execute(Command::UpdateSupplier { id, update }).await?,
            Supplier
        )
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute(Command::DeleteSupplier { id }).await.map(drop)
    }
}
