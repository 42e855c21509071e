//! Command handlers.

pub mod auth;
pub mod config_cmd;
pub mod defaults;
pub mod devices;
pub mod locations;
pub mod util;
pub mod watch;

use trackdash_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;

/// Dispatch a backend command. Local commands are handled in `main`.
pub async fn dispatch(
    cmd: Command,
    conn: &Connection,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Locations(args) => locations::handle(conn, args, global).await,
        Command::Watch(args) => watch::handle(conn, cfg, args, global).await,
        Command::Devices(args) => devices::handle(conn, args, global).await,
        Command::Defaults(args) => defaults::handle(conn, args, global).await,
        Command::Login(_)
        | Command::Logout
        | Command::Status
        | Command::Config(_)
        | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to the backend dispatcher".into(),
        )),
    }
}
