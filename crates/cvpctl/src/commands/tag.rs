//! Tag command handlers.

use std::time::Duration;

use cvp_api::{BuildWait, CvpClient, TagMutation};

use crate::cli::{GlobalOpts, TagArgs, TagCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &CvpClient,
    args: TagArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TagCommand::Create {
            label,
            value,
            element_type,
            build_wait,
        } => {
            let tag = TagMutation {
                label,
                value,
                element_type: element_type.into(),
            };
            let wait = BuildWait {
                max_wait: Duration::from_secs(build_wait),
                ..BuildWait::default()
            };

            // Any failure along create/stage/build/submit aborts the
            // whole sequence; there is no partial-success report.
            let submit_response = client.create_tag(&tag, &wait).await?;

            let rendered = output::render(&global.output, &submit_response);
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
