// slate-core: Query cache and mutation layer between slate-api and consumers (CLI, UI).

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod key;
pub mod mutation;
pub mod query;
pub mod resources;
pub mod slate;

mod queries;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{
    CacheEvent, EntrySnapshot, FetchResult, Fetcher, InvalidationSink, QueryCache, QueryData,
    QueryStatus, Subscription,
};
pub use command::{Command, CommandResult, MutationDescriptor};
pub use config::{CacheConfig, RetryPolicy, SlateConfig, TlsVerification};
pub use error::CoreError;
pub use key::ResourceKey;
pub use mutation::Mutation;
pub use query::{Query, QueryState};
pub use slate::Slate;

// Consumers build requests and read entities without depending on
// slate-api directly.
pub use slate_api::Error as ApiError;
pub use slate_api::{
    // Auth
    EnvToken, SessionToken, StaticToken, TokenProvider,
    // Money
    Cents,
    // Finance
    BankAccount, CreateInvoiceRequest, CreateTransactionRequest, Invoice, InvoiceFilter,
    InvoiceLineItem, InvoiceStatus, Transaction, TransactionFilter, TransactionKind,
    UpdateInvoiceRequest,
    // Team
    CreateInviteRequest, Invite, InviteStatus, TeamMember, TeamRole, UpdateTeamMemberRequest,
    // Production
    Character, CreateCharacterRequest, CreateProjectRequest, CreateSceneRequest, Project,
    ProjectStatus, Scene, UpdateCharacterRequest, UpdateProjectRequest, UpdateSceneRequest,
    // Contacts
    CreateStakeholderRequest, CreateSupplierRequest, Stakeholder, Supplier, UpdateContactRequest,
};
