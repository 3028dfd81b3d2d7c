//! `mail4ews` - check Exchange Web Services connection settings.
//!
//! Builds a service handle the same way a mail session would and, with
//! `--verify`, binds to the Inbox to prove that host and credentials work.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use mail4ews_core::{ConnectionParams, Defaults, ServiceFactory, SessionProperties, keys};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Check Exchange Web Services connection settings.
#[derive(Debug, Parser)]
#[command(name = "mail4ews", version, about)]
struct Cli {
    /// EWS endpoint URL, e.g. `https://mail.example.com/EWS/Exchange.asmx`.
    #[arg(long)]
    host: String,

    /// Port reported by the mail session (informational only).
    #[arg(long, default_value_t = 443)]
    port: u16,

    /// Username.
    #[arg(long, short)]
    user: Option<String>,

    /// Password.
    #[arg(long, short, env = "MAIL4EWS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// TOML file with default properties (bundled defaults otherwise).
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Session property as KEY=VALUE; may be repeated.
    #[arg(long = "property", short = 'D', value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Bind to the Inbox to verify the settings.
    #[arg(long)]
    verify: bool,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mail4ews=info,mail4ews_core=info,mail4ews_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let defaults = cli
        .defaults
        .as_ref()
        .map_or_else(Defaults::load, Defaults::load_from_path);
    let factory = ServiceFactory::new(Arc::new(defaults));

    let mut session: SessionProperties = cli.properties.into_iter().collect();
    if cli.verify {
        session.insert(keys::VERIFY_CONNECTION_ON_CONNECT, "true");
    }

    let mut params = ConnectionParams::new(cli.host).port(cli.port);
    params.user = cli.user;
    params.password = cli.password;

    info!("Checking EWS endpoint {}", params.host);

    let Some(service) = factory.build_service(&params, &session).await? else {
        anyhow::bail!("username and password are required, EWS is not configured");
    };

    println!(
        "endpoint: {}",
        service.url().map_or_else(String::new, ToString::to_string)
    );
    println!("version:  {}", service.requested_server_version());
    println!("timeout:  {} ms", service.timeout().as_millis());
    println!("trace:    {}", service.is_trace_enabled());
    println!(
        "verified: {}",
        factory.configuration(&session).verify_on_connect()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("mail.pop3.timeout=5000").unwrap(),
            ("mail.pop3.timeout".to_string(), "5000".to_string())
        );
        assert_eq!(
            parse_property("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "mail4ews",
            "--host",
            "https://mail.example.com/EWS/Exchange.asmx",
            "-u",
            "alice",
            "-p",
            "secret",
            "-D",
            "mail.pop3.connectiontimeout=1000",
            "--verify",
        ])
        .unwrap();

        assert_eq!(cli.port, 443);
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.properties.len(), 1);
        assert!(cli.verify);
    }
}
