mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use cvp_api::CvpClient;
use cvp_config::ControllerConfig;

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let controller = build_controller_config(&cli.global)?;
    let client = CvpClient::new(controller.url, &controller.token, &controller.transport)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &client, &cli.global).await
}

/// Build a `ControllerConfig` from the config file, profile, and CLI
/// flag overrides. Credentials are resolved exactly once, here, and
/// passed explicitly to the client.
///
/// CLI flags (and their `CVP`/`CVPTOKEN` env fallbacks, wired through
/// clap) are overlaid onto the selected profile before resolution.
fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let mut cfg = cvp_config::load_config_or_default();

    let name = global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    if global.profile.is_some() && !cfg.profiles.contains_key(&name) {
        return Err(cvp_config::ConfigError::ProfileNotFound { name }.into());
    }

    let profile = cfg.profiles.entry(name.clone()).or_default();
    if let Some(ref host) = global.host {
        profile.host = Some(host.clone());
    }
    if let Some(ref token) = global.token {
        profile.token = Some(token.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    let mut controller = cvp_config::resolve(&cfg, Some(&name))?;

    // clap already ranks --token above its CVPTOKEN fallback, so the
    // CLI value beats whatever the resolver read from the environment.
    if let Some(ref token) = global.token {
        controller.token = SecretString::from(token.clone());
    }

    Ok(controller)
}
