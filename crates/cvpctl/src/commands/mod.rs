//! Command handlers.

pub mod reads;
pub mod tag;

use cvp_api::CvpClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    client: &CvpClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Inventory => reads::inventory(client, global).await,
        Command::Events => reads::events(client, global).await,
        Command::Connectivity => reads::connectivity(client, global).await,
        Command::Tag(args) => tag::handle(client, args, global).await,
    }
}
