//! Clap derive structures for the `cvpctl` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use cvp_api::ElementType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cvpctl -- CLI for the Arista CloudVision controller
#[derive(Debug, Parser)]
#[command(
    name = "cvpctl",
    version,
    about = "Query and mutate an Arista CloudVision controller",
    long_about = "Read device inventory, events, and connectivity monitor data from a\n\
        CloudVision controller, and create tags through the workspace\n\
        create/build/submit transaction protocol.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "CVPCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host or URL (overrides profile)
    #[arg(long, env = "CVP", global = true)]
    pub host: Option<String>,

    /// Bearer token
    #[arg(long, env = "CVPTOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all devices known to the controller
    #[command(alias = "inv")]
    Inventory,

    /// List all controller events
    Events,

    /// Connectivity monitor probe stats (latency, jitter, packet loss)
    #[command(alias = "conn")]
    Connectivity,

    /// Manage tags
    Tag(TagArgs),
}

// ── Tag ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Create a tag via a workspace transaction (create/build/submit)
    Create {
        /// Tag label
        label: String,

        /// Tag value
        value: String,

        /// Element type the tag binds to
        #[arg(long, value_enum, default_value = "device")]
        element_type: ElementTypeArg,

        /// Maximum seconds to wait for the workspace build
        #[arg(long, default_value = "30")]
        build_wait: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ElementTypeArg {
    Device,
    Interface,
}

impl From<ElementTypeArg> for ElementType {
    fn from(arg: ElementTypeArg) -> Self {
        match arg {
            ElementTypeArg::Device => Self::Device,
            ElementTypeArg::Interface => Self::Interface,
        }
    }
}
