//! Clap derive structures for the `pamly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This file is also compiled by `build.rs` for man page generation, so it
//! may only depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pamly -- command-line client for a privileged access management appliance
#[derive(Debug, Parser)]
#[command(
    name = "pamly",
    version,
    about = "Request, check out and rotate privileged credentials from the command line",
    long_about = "A CLI for the appliance core REST API.\n\n\
        Browse users, assets, accounts and policies, drive access requests\n\
        through their lifecycle, and follow password jobs to completion.",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "PAMLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance URL (overrides profile)
    #[arg(long, short = 'a', env = "PAMLY_APPLIANCE", global = true)]
    pub appliance: Option<String>,

    /// Pre-issued user token (skips the password login)
    #[arg(long, env = "PAMLY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PAMLY_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PAMLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (defaults to the profile's, then 30)
    #[arg(long, env = "PAMLY_TIMEOUT", global = true)]
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
    /// Browse appliance users
    #[command(alias = "u")]
    Users(ResourceArgs),

    /// Browse assets (managed systems)
    Assets(ResourceArgs),

    /// Browse asset accounts and run password jobs
    #[command(alias = "acct")]
    Accounts(AccountsArgs),

    /// Browse access policies
    Policies(ResourceArgs),

    /// Browse entitlement roles
    Roles(ResourceArgs),

    /// Browse identity providers
    Providers(ResourceArgs),

    /// Inspect cluster members
    Cluster(ClusterArgs),

    /// Create, check out and close access requests
    #[command(alias = "req", alias = "r")]
    Requests(RequestsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared filtering arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring match on the name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort by property; prefix with '-' for descending (e.g. -Name)
    #[arg(long, allow_hyphen_values = true)]
    pub order_by: Option<String>,
}

// ── Read-only resources ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record id
        id: i64,
    },
}

// ── Accounts ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List asset accounts
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one asset account
    Get {
        /// Account id
        id: i64,
    },

    /// Rotate the password of one or more accounts
    ChangePassword(TaskArgs),

    /// Verify the stored password of one or more accounts
    CheckPassword(TaskArgs),
}

#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Account ids
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,

    /// Wait up to this many seconds for each job to finish (0 = don't wait)
    #[arg(long, short = 'w', default_value = "120")]
    pub wait: u64,
}

// ── Cluster ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClusterArgs {
    #[command(subcommand)]
    pub command: ClusterCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClusterCommand {
    /// List cluster members
    Members,
}

// ── Access requests ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub command: RequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RequestsCommand {
    /// List access requests visible to you
    #[command(alias = "ls")]
    List {
        /// Only requests in this state (e.g. RequestAvailable)
        #[arg(long)]
        state: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List accounts you are entitled to request
    Entitlements(ListArgs),

    /// Request access to one or more accounts
    Create(CreateRequestArgs),

    /// Check out the password of a request
    #[command(alias = "co")]
    Checkout {
        /// Access request id
        id: String,

        /// Wait up to this many seconds for a pending request (0 = don't wait)
        #[arg(long, short = 'w', default_value = "0")]
        wait: u64,
    },

    /// Close a request the way its state allows (check in or cancel)
    Close {
        /// Access request id
        id: String,
    },

    /// Cancel a request
    Cancel {
        /// Access request id
        id: String,
    },

    /// Check a checked-out request back in
    #[command(alias = "ci")]
    Checkin {
        /// Access request id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateRequestArgs {
    /// Account ids (must appear in `requests entitlements`)
    #[arg(long = "account", required = true, num_args = 1..)]
    pub accounts: Vec<i64>,

    /// Requested duration in minutes
    #[arg(long, short = 'd')]
    pub duration: Option<u32>,

    /// Request on behalf of another user
    #[arg(long = "for")]
    pub requester: Option<String>,

    /// Reason code name
    #[arg(long)]
    pub reason_code: Option<String>,

    /// Free-text justification
    #[arg(long, short = 'm')]
    pub comment: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (secrets masked)
    Show,

    /// Create or update a profile interactively
    Init,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile's password in the system keyring
    SetPassword,

    /// Store a pre-issued user token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
