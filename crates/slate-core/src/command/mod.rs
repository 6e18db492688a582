// ── Command API ──
//
// All write operations flow through a unified `Command` enum. Each
// command describes itself as a `MutationDescriptor` (endpoint, method,
// payload, affected keys); the command processor sends it, invalidates
// the affected keys, and only then replies.

mod descriptor;

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use slate_api::{
    Character, CreateCharacterRequest, CreateInviteRequest, CreateInvoiceRequest,
    CreateProjectRequest, CreateSceneRequest, CreateStakeholderRequest, CreateSupplierRequest,
    CreateTransactionRequest, Invite, Invoice, Project, ResendInviteResponse, Scene, Stakeholder,
    Supplier, TeamMember, Transaction, UpdateCharacterRequest, UpdateContactRequest,
    UpdateInvoiceRequest, UpdateProjectRequest, UpdateSceneRequest, UpdateTeamMemberRequest,
};

pub use descriptor::MutationDescriptor;

use crate::cache::QueryData;
use crate::error::CoreError;
use crate::key::ResourceKey;
use crate::resources;

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against the backend.
#[derive(Debug, Clone, strum::IntoStaticStr)]
pub enum Command {
    // ── Finance ──────────────────────────────────────────────────────
    CreateInvoice(CreateInvoiceRequest),
    UpdateInvoice {
        id: Uuid,
        update: UpdateInvoiceRequest,
    },
    DeleteInvoice {
        id: Uuid,
    },
    CreateTransaction(CreateTransactionRequest),
    DeleteTransaction {
        id: Uuid,
    },

    // ── Team ─────────────────────────────────────────────────────────
    UpdateTeamMember {
        id: Uuid,
        update: UpdateTeamMemberRequest,
    },
    RemoveTeamMember {
        id: Uuid,
    },
    CreateInvite(CreateInviteRequest),
    ResendInvite {
        id: Uuid,
    },
    RevokeInvite {
        id: Uuid,
    },

    // ── Production ───────────────────────────────────────────────────
    CreateProject(CreateProjectRequest),
    UpdateProject {
        id: Uuid,
        update: UpdateProjectRequest,
    },
    DeleteProject {
        id: Uuid,
    },
    CreateScene(CreateSceneRequest),
    UpdateScene {
        id: Uuid,
        update: UpdateSceneRequest,
    },
    DeleteScene {
        id: Uuid,
    },
    CreateCharacter(CreateCharacterRequest),
    UpdateCharacter {
        id: Uuid,
        update: UpdateCharacterRequest,
    },
    DeleteCharacter {
        id: Uuid,
    },

    // ── Contacts ─────────────────────────────────────────────────────
    CreateStakeholder(CreateStakeholderRequest),
    UpdateStakeholder {
        id: Uuid,
        update: UpdateContactRequest,
    },
    DeleteStakeholder {
        id: Uuid,
    },
    CreateSupplier(CreateSupplierRequest),
    UpdateSupplier {
        id: Uuid,
        update: UpdateContactRequest,
    },
    DeleteSupplier {
        id: Uuid,
    },
}

/// Result of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// No body worth keeping (deletes, removals, revocations).
    Ok,
    Invoice(Invoice),
    Transaction(Transaction),
    TeamMember(TeamMember),
    Invite(Invite),
    /// Fresh link from a resent invite.
    InviteLink(String),
    Project(Project),
    Scene(Scene),
    Character(Character),
    Stakeholder(Stakeholder),
    Supplier(Supplier),
}

impl Command {
    /// Variant name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Interpret the backend's response body for this command.
    pub(crate) fn decode(&self, body: serde_json::Value) -> Result<CommandResult, CoreError> {
        Ok(match self {
            Self::CreateInvoice(_) | Self::UpdateInvoice { .. } => {
                CommandResult::Invoice(parse(body)?)
            }
            Self::CreateTransaction(_) => CommandResult::Transaction(parse(body)?),
            Self::UpdateTeamMember { .. } => CommandResult::TeamMember(parse(body)?),
            Self::CreateInvite(_) => CommandResult::Invite(parse(body)?),
            Self::ResendInvite { .. } => {
                let resp: ResendInviteResponse = parse(body)?;
                CommandResult::InviteLink(resp.invite_link)
            }
            Self::CreateProject(_) | Self::UpdateProject { .. } => {
                CommandResult::Project(parse(body)?)
            }
            Self::CreateScene(_) | Self::UpdateScene { .. } => CommandResult::Scene(parse(body)?),
            Self::CreateCharacter(_) | Self::UpdateCharacter { .. } => {
                CommandResult::Character(parse(body)?)
            }
            Self::CreateStakeholder(_) | Self::UpdateStakeholder { .. } => {
                CommandResult::Stakeholder(parse(body)?)
            }
            Self::CreateSupplier(_) | Self::UpdateSupplier { .. } => {
                CommandResult::Supplier(parse(body)?)
            }
            Self::DeleteInvoice { .. }
            | Self::DeleteTransaction { .. }
            | Self::RemoveTeamMember { .. }
            | Self::RevokeInvite { .. }
            | Self::DeleteProject { .. }
            | Self::DeleteScene { .. }
            | Self::DeleteCharacter { .. }
            | Self::DeleteStakeholder { .. }
            | Self::DeleteSupplier { .. } => CommandResult::Ok,
        })
    }
}

impl CommandResult {
    /// Detail-cache entry this result can prime, if a detail query exists
    /// for its resource.
    pub(crate) fn detail_seed(&self) -> Option<(ResourceKey, QueryData)> {
        match self {
            Self::Invoice(inv) => Some((
                resources::detail(resources::INVOICES, inv.id),
                Arc::new(inv.clone()) as QueryData,
            )),
            Self::Project(p) => Some((
                resources::detail(resources::PROJECTS, p.id),
                Arc::new(p.clone()) as QueryData,
            )),
            _ => None,
        }
    }
}

fn parse<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, CoreError> {
    <T as Deserialize>::deserialize(&body).map_err(|e| {
        CoreError::Api(slate_api::Error::Deserialization {
            message: e.to_string(),
            body: body.to_string(),
        })
    })
}
