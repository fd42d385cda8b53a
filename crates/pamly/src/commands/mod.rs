//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod accounts;
pub mod assets;
pub mod cluster;
pub mod config_cmd;
pub mod policies;
pub mod providers;
pub mod requests;
pub mod roles;
pub mod users;
pub mod util;

use pamly_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(session, args, global).await,
        Command::Assets(args) => assets::handle(session, args, global).await,
        Command::Accounts(args) => accounts::handle(session, args, global).await,
        Command::Policies(args) => policies::handle(session, args, global).await,
        Command::Roles(args) => roles::handle(session, args, global).await,
        Command::Providers(args) => providers::handle(session, args, global).await,
        Command::Cluster(args) => cluster::handle(session, args, global).await,
        Command::Requests(args) => requests::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
