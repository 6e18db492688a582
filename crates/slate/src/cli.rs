//! Clap derive structures for the `slate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use slate_core::{Cents, InviteStatus, InvoiceStatus, ProjectStatus, TeamRole, TransactionKind};

use crate::commands::util::{parse_enum, parse_money};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// slate -- film production finances, team and breakdowns from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "slate",
    version,
    about = "Manage Slate film productions from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "SLATE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "SLATE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session token (overrides profile)
    #[arg(long, env = "SLATE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Organization ID (overrides profile)
    #[arg(long, env = "SLATE_ORG", global = true)]
    pub org: Option<Uuid>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SLATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SLATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage invoices
    #[command(alias = "inv")]
    Invoices(InvoicesArgs),

    /// Record and list income and expenses
    #[command(alias = "tx")]
    Transactions(TransactionsArgs),

    /// View bank accounts and balances
    BankAccounts(BankAccountsArgs),

    /// Manage team members
    Team(TeamArgs),

    /// Manage team invites
    Invites(InvitesArgs),

    /// Manage projects
    #[command(alias = "proj")]
    Projects(ProjectsArgs),

    /// Manage a project's scenes
    Scenes(ScenesArgs),

    /// Manage a project's characters
    Characters(CharactersArgs),

    /// Manage stakeholders (investors, producers, partners)
    Stakeholders(StakeholdersArgs),

    /// Manage suppliers
    Suppliers(SuppliersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVOICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InvoicesArgs {
    #[command(subcommand)]
    pub command: InvoicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum InvoicesCommand {
    /// List invoices
    #[command(alias = "ls")]
    List {
        /// Only invoices with this status
        #[arg(long, value_parser = parse_enum::<InvoiceStatus>)]
        status: Option<InvoiceStatus>,

        /// Only invoices for this project
        #[arg(long)]
        project: Option<Uuid>,

        /// Only invoices from this supplier
        #[arg(long)]
        supplier: Option<Uuid>,
    },

    /// Get invoice details
    Get {
        /// Invoice ID
        id: Uuid,
    },

    /// Create an invoice
    Create {
        /// Invoice number (e.g. INV-2024-001)
        #[arg(long)]
        number: String,

        /// ISO currency code
        #[arg(long, default_value = "EUR")]
        currency: String,

        #[arg(long)]
        project: Option<Uuid>,

        #[arg(long)]
        supplier: Option<Uuid>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Line item as DESCRIPTION:QUANTITY:UNIT_PRICE (repeatable)
        #[arg(long = "item", value_name = "ITEM")]
        items: Vec<String>,
    },

    /// Update an invoice
    Update {
        /// Invoice ID
        id: Uuid,

        #[arg(long, value_parser = parse_enum::<InvoiceStatus>)]
        status: Option<InvoiceStatus>,

        #[arg(long)]
        number: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Delete an invoice
    Delete {
        /// Invoice ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRANSACTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    /// List transactions
    #[command(alias = "ls")]
    List {
        /// income or expense
        #[arg(long = "type", value_parser = parse_enum::<TransactionKind>)]
        kind: Option<TransactionKind>,

        /// Only transactions on this bank account
        #[arg(long)]
        account: Option<Uuid>,

        #[arg(long)]
        project: Option<Uuid>,
    },

    /// Record an income or expense
    Create {
        /// income or expense
        #[arg(long = "type", value_parser = parse_enum::<TransactionKind>)]
        kind: TransactionKind,

        /// Amount (e.g. 1250.00)
        #[arg(long, value_parser = parse_money)]
        amount: Cents,

        /// Bank account the money moves through
        #[arg(long)]
        account: Option<Uuid>,

        /// Invoice this payment settles
        #[arg(long)]
        invoice: Option<Uuid>,

        #[arg(long)]
        project: Option<Uuid>,

        #[arg(long)]
        description: Option<String>,

        /// Booking date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BANK ACCOUNTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BankAccountsArgs {
    #[command(subcommand)]
    pub command: BankAccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BankAccountsCommand {
    /// List bank accounts with balances
    #[command(alias = "ls")]
    List,

    /// Get bank account details
    Get {
        /// Bank account ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEAM / INVITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    /// List team members
    #[command(alias = "ls")]
    List,

    /// Change a member's role
    SetRole {
        /// Team member ID
        id: Uuid,

        /// owner, admin, member or viewer
        #[arg(value_parser = parse_enum::<TeamRole>)]
        role: TeamRole,
    },

    /// Remove a member from the organization
    Remove {
        /// Team member ID
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct InvitesArgs {
    #[command(subcommand)]
    pub command: InvitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum InvitesCommand {
    /// List invites
    #[command(alias = "ls")]
    List {
        /// pending, accepted, revoked or expired
        #[arg(long, value_parser = parse_enum::<InviteStatus>)]
        status: Option<InviteStatus>,
    },

    /// Invite someone to the organization
    Create {
        /// Email address to invite
        email: String,

        #[arg(long, default_value = "member", value_parser = parse_enum::<TeamRole>)]
        role: TeamRole,
    },

    /// Re-send an invite and print the new link
    Resend {
        /// Invite ID
        id: Uuid,
    },

    /// Revoke a pending invite
    Revoke {
        /// Invite ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects
    #[command(alias = "ls")]
    List,

    /// Get project details
    Get {
        /// Project ID
        id: Uuid,
    },

    /// Create a project
    Create {
        /// Project name
        name: String,

        #[arg(long, value_parser = parse_enum::<ProjectStatus>)]
        status: Option<ProjectStatus>,

        #[arg(long)]
        description: Option<String>,

        /// Budget (e.g. 250000.00)
        #[arg(long, value_parser = parse_money)]
        budget: Option<Cents>,
    },

    /// Update a project
    Update {
        /// Project ID
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_enum::<ProjectStatus>)]
        status: Option<ProjectStatus>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_money)]
        budget: Option<Cents>,
    },

    /// Delete a project with its scenes and characters
    Delete {
        /// Project ID
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct ScenesArgs {
    #[command(subcommand)]
    pub command: ScenesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenesCommand {
    /// List a project's scenes
    #[command(alias = "ls")]
    List {
        /// Project ID
        #[arg(long)]
        project: Uuid,
    },

    /// Add a scene
    Create {
        /// Project ID
        #[arg(long)]
        project: Uuid,

        /// Scene number (e.g. 12A)
        #[arg(long)]
        number: String,

        /// Scene heading
        title: String,

        #[arg(long)]
        location: Option<String>,
    },

    /// Delete a scene
    Delete {
        /// Scene ID
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct CharactersArgs {
    #[command(subcommand)]
    pub command: CharactersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CharactersCommand {
    /// List a project's characters
    #[command(alias = "ls")]
    List {
        /// Project ID
        #[arg(long)]
        project: Uuid,
    },

    /// Add a character
    Create {
        /// Project ID
        #[arg(long)]
        project: Uuid,

        /// Character name
        name: String,

        /// Cast actor
        #[arg(long)]
        actor: Option<String>,
    },

    /// Delete a character
    Delete {
        /// Character ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTACTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StakeholdersArgs {
    #[command(subcommand)]
    pub command: StakeholdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum StakeholdersCommand {
    /// List stakeholders
    #[command(alias = "ls")]
    List,

    /// Add a stakeholder
    Create {
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        company: Option<String>,

        /// Role on the production (e.g. "executive producer")
        #[arg(long)]
        role: Option<String>,
    },

    /// Delete a stakeholder
    Delete {
        /// Stakeholder ID
        id: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct SuppliersArgs {
    #[command(subcommand)]
    pub command: SuppliersCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuppliersCommand {
    /// List suppliers
    #[command(alias = "ls")]
    List,

    /// Add a supplier
    Create {
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// e.g. "catering", "grip & electric"
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a supplier
    Delete {
        /// Supplier ID
        id: Uuid,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g. "api_url", "organization_id", "stale_time_secs")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a session token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
