//! Clap derive structures for the `klrent` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// klrent -- browse the fleet, price and book rentals with KL Rent a Car
#[derive(Debug, Parser)]
#[command(
    name = "klrent",
    version,
    about = "Browse the KL Rent a Car fleet and manage reservations from the command line",
    long_about = "A command-line client for the KL Rent a Car rental portal.\n\n\
        Lists vehicle groups, promotional plans, and stores; quotes and books\n\
        reservations; and shows your reservation and rental history.",
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
    /// Portal profile to use
    #[arg(long, short = 'p', env = "KLRENT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Portal API URL (overrides profile)
    #[arg(long, env = "KLRENT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "KLRENT_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "KLRENT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "KLRENT_TIMEOUT", global = true)]
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

/// Insurance coverage.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Coverage {
    /// Basic coverage
    #[default]
    Basic,
    /// Premium coverage
    Premium,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse vehicle groups
    #[command(alias = "f")]
    Fleet(FleetArgs),

    /// List promotional plans for a vehicle group
    Plans(OfferArg),

    /// List pickup stores for a state
    Stores(StoresArgs),

    /// Price a reservation without booking it
    #[command(alias = "q")]
    Quote(QuoteArgs),

    /// Book a reservation
    Reserve(ReserveArgs),

    /// View and cancel reservations
    #[command(alias = "res")]
    Reservations(ReservationsArgs),

    /// View rental history
    Rentals(RentalsArgs),

    /// Vehicle documents
    #[command(alias = "docs")]
    Documents(DocumentsArgs),

    /// Log in to the portal
    Login(LoginArgs),

    /// Log out and forget the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Ask the portal to send a password reset e-mail
    ForgotPassword(ForgotPasswordArgs),

    /// Create a portal account or register as a customer
    Register(RegisterArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// A vehicle group in a state.
#[derive(Debug, Args)]
pub struct OfferArg {
    /// Offer link token (as in the portal URL) or `ID-STATE_ID`
    pub offer: String,
}

/// The inputs of a reservation.
#[derive(Debug, Args)]
pub struct BookingArgs {
    /// Offer link token (as in the portal URL) or `ID-STATE_ID`
    pub offer: String,

    /// Pickup date (YYYY-MM-DD); defaults to the next business day
    #[arg(long)]
    pub pickup: Option<NaiveDate>,

    /// Return date (YYYY-MM-DD); derived from the pickup date by default
    #[arg(long = "return", value_name = "DATE")]
    pub return_date: Option<NaiveDate>,

    /// Use a promotional plan
    #[arg(long)]
    pub promo: bool,

    /// Promotional plan ID (implies --promo)
    #[arg(long)]
    pub plan: Option<u64>,

    /// Insurance coverage
    #[arg(long, short = 'i', default_value = "basic")]
    pub insurance: Coverage,

    /// Pickup store ID; defaults to the first store in the state
    #[arg(long)]
    pub store: Option<u64>,
}

// ── Fleet ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FleetArgs {
    #[command(subcommand)]
    pub command: FleetCommand,
}

#[derive(Debug, Subcommand)]
pub enum FleetCommand {
    /// List vehicle groups
    #[command(alias = "ls")]
    List(FleetListArgs),

    /// Show a vehicle group with its stores and plans
    Show(OfferArg),

    /// List vehicle categories
    Categories,

    /// List vehicle brands
    Brands,

    /// List the states with vehicles on offer
    States,

    /// List the vehicle group names on offer
    Groups,
}

#[derive(Debug, Args)]
pub struct FleetListArgs {
    /// Only groups in this state (name, case-insensitive)
    #[arg(long)]
    pub state: Option<String>,

    /// Only this group (name, case-insensitive)
    #[arg(long)]
    pub group: Option<String>,

    /// Minimum daily rate
    #[arg(long)]
    pub min_daily: Option<Decimal>,

    /// Maximum daily rate
    #[arg(long)]
    pub max_daily: Option<Decimal>,

    /// Search group and state names
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Category (filtered by the portal)
    #[arg(long)]
    pub category: Option<String>,

    /// Brand (filtered by the portal)
    #[arg(long)]
    pub brand: Option<String>,

    /// Only available vehicles
    #[arg(long)]
    pub available: bool,
}

// ── Stores ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StoresArgs {
    /// State ID
    pub state_id: u64,
}

// ── Quote / Reserve ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub booking: BookingArgs,

    /// Price as of this date instead of today (YYYY-MM-DD)
    #[arg(long, hide = true)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ReserveArgs {
    #[command(flatten)]
    pub booking: BookingArgs,

    /// Pickup time (HH:MM)
    #[arg(long, default_value = "09:00")]
    pub pickup_time: String,

    /// Return time (HH:MM)
    #[arg(long, default_value = "09:00")]
    pub return_time: String,
}

// ── Reservations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List your reservations
    #[command(alias = "ls")]
    List {
        /// Every reservation visible to the account, not only your own
        #[arg(long)]
        all: bool,
    },

    /// Show a reservation
    Show {
        /// Reservation ID
        id: u64,
    },

    /// Cancel a reservation
    Cancel {
        /// Reservation ID
        id: u64,

        /// Why the reservation is being cancelled
        #[arg(long, short = 'r')]
        reason: Option<String>,
    },
}

// ── Rentals / Documents ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RentalsArgs {
    /// Only rentals not yet returned
    #[arg(long)]
    pub active: bool,
}

#[derive(Debug, Args)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    pub command: DocumentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocumentsCommand {
    /// Print the document folder link for a rented car
    Link {
        /// Car ID (from `klrent rentals`)
        car_id: u64,
    },
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login e-mail (defaults to the profile's)
    #[arg(long, short = 'e', env = "KLRENT_EMAIL")]
    pub email: Option<String>,
}

#[derive(Debug, Args)]
pub struct ForgotPasswordArgs {
    /// Account e-mail
    pub email: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[command(subcommand)]
    pub command: RegisterCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegisterCommand {
    /// Create a portal account and log in
    Account {
        /// Full name
        #[arg(long)]
        name: String,

        /// E-mail
        #[arg(long)]
        email: String,
    },

    /// Register as an individual customer (CPF)
    Individual(RegistrationArgs),

    /// Register as a company customer (CNPJ)
    Company(RegistrationArgs),
}

#[derive(Debug, Args)]
pub struct RegistrationArgs {
    /// Read the form from a JSON file instead of prompting
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: api_url, email, password_env, timeout, insecure, ca_cert, origin
        key: String,

        /// Value
        value: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
