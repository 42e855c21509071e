//! Clap derive structures for the `trackdash` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// trackdash -- browse GPS fleet locations from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "trackdash",
    version,
    about = "Browse GPS fleet locations and tune tracker settings",
    long_about = "Terminal dashboard for a GPS fleet tracking backend.\n\n\
        Lists paginated location fixes with device and date filters, follows\n\
        new fixes live, and edits default and per-device timer settings.",
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
    /// Config file to use instead of the platform default
    #[arg(long, env = "TRACKDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend API root (overrides api.base_url)
    #[arg(long, short = 'u', env = "TRACKDASH_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TRACKDASH_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TRACKDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides api.timeout_secs)
    #[arg(long, env = "TRACKDASH_TIMEOUT", global = true)]
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
    /// Log in to the dashboard
    Login(LoginArgs),

    /// Log out and forget the saved session
    Logout,

    /// Show whether a saved session is active
    Status,

    /// List location fixes, one page at a time
    #[command(alias = "loc", alias = "l")]
    Locations(LocationsArgs),

    /// Follow the newest location fixes, refreshing periodically
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// List devices and edit per-device tracker settings
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show or edit the default tracker settings
    Defaults(DefaultsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'U', env = "TRACKDASH_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "TRACKDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Location filters ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Only fixes from the device with this IMEI
    #[arg(long)]
    pub imei: Option<String>,

    /// First day to include (YYYY-MM-DD, local time)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, local time)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct LocationsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page number (1-based)
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Records per page: 5, 10, 25, 50 or 100 (defaults to session.page_size)
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,

    /// Show the full detail of this record after the listing
    #[arg(long, value_name = "ID")]
    pub select: Option<i64>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Records per page: 5, 10, 25, 50 or 100 (defaults to session.page_size)
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,

    /// Seconds between refreshes (defaults to session.refresh_interval_secs, then 30)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show a device's tracker settings
    Config {
        /// Device IMEI
        imei: String,
    },

    /// Change a device's tracker settings
    SetConfig(SetDeviceConfigArgs),
}

#[derive(Debug, Args)]
pub struct SetDeviceConfigArgs {
    /// Device IMEI
    pub imei: String,

    #[command(flatten)]
    pub values: TimerArgs,

    /// Service URL the device reports to
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Field assignments shared by the settings editors.
#[derive(Debug, Args)]
pub struct TimerArgs {
    /// Set a timer field, e.g. `--set gpsTimer=10` (repeatable)
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    /// Start from the built-in default values before applying --set
    #[arg(long)]
    pub reset: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    #[command(subcommand)]
    pub command: DefaultsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DefaultsCommand {
    /// Show the default tracker settings
    Show,

    /// Change the default tracker settings
    Set(TimerArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file
    Init {
        /// Backend API root to store
        #[arg(long)]
        base_url: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
