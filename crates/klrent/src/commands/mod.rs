//! Command dispatch: bridges CLI args -> portal operations -> output formatting.

pub mod account;
pub mod booking;
pub mod catalog;
pub mod config_cmd;
pub mod register;
pub mod rentals;
pub mod reservations;
pub mod util;

use klrent_core::Portal;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a portal-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    portal: &Portal,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Fleet(args) => catalog::handle_fleet(portal, args, global).await,
        Command::Plans(args) => catalog::handle_plans(portal, &args, global).await,
        Command::Stores(args) => catalog::handle_stores(portal, &args, global).await,
        Command::Quote(args) => booking::handle_quote(portal, args, global).await,
        Command::Reserve(args) => booking::handle_reserve(portal, args, global).await,
        Command::Reservations(args) => reservations::handle(portal, args, global).await,
        Command::Rentals(args) => rentals::handle_rentals(portal, &args, global).await,
        Command::Documents(args) => rentals::handle_documents(portal, args, global).await,
        Command::Login(args) => account::login(portal, args, cfg, global).await,
        Command::Logout => account::logout(portal, global).await,
        Command::Whoami => account::whoami(portal, global).await,
        Command::ForgotPassword(args) => account::forgot_password(portal, &args, global).await,
        Command::Register(args) => register::handle(portal, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "configuration commands do not reach the portal".into(),
        )),
    }
}
