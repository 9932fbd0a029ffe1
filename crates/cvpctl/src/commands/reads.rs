//! Read-tool handlers: inventory, events, connectivity monitor.
//!
//! These share the downgraded read contract: a failed fetch prints
//! JSON `null` and exits successfully, rather than aborting the way
//! the write path does.

use cvp_api::CvpClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// All devices known to the controller.
pub async fn inventory(client: &CvpClient, global: &GlobalOpts) -> Result<(), CliError> {
    emit(client.inventory().await, global);
    Ok(())
}

/// All controller events.
pub async fn events(client: &CvpClient, global: &GlobalOpts) -> Result<(), CliError> {
    emit(client.events().await, global);
    Ok(())
}

/// Connectivity monitor probe stats.
pub async fn connectivity(client: &CvpClient, global: &GlobalOpts) -> Result<(), CliError> {
    emit(client.connectivity_monitor().await, global);
    Ok(())
}

fn emit(collection: Option<Vec<serde_json::Value>>, global: &GlobalOpts) {
    let rendered = output::render(&global.output, &collection);
    output::print_output(&rendered, global.quiet);
}
