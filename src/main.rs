//! LiveView demo server.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use liveview_config::{Config, ConfigLoader, ConfigValidator};
use liveview_core::TokenIssuer;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod demo;
mod server;
mod swap;
#[cfg(test)]
mod testing;

/// LiveView CLI.
#[derive(Parser)]
#[command(name = "liveview")]
#[command(about = "Server-driven DOM sessions over WebSocket")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/liveview.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a freshly signed session token
    Token,
}

/// Get the LiveView home directory (~/.liveview).
fn liveview_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".liveview")
}

/// Initialize tracing with console and daily rolling file output.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = liveview_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("liveview")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load and validate the configuration. Validation warnings are logged,
/// the first validation error aborts.
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        None => {
            info!("Using config {}", cli.config.display());
            server::run_server(config).await?;
        }
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Using config {}", cli.config.display());
            server::run_server(config).await?;
        }
        Some(Commands::Token) => {
            let authenticator = server::build_authenticator(&config.auth)?;
            println!("{}", authenticator.issue()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["liveview"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config/liveview.toml"));
    }

    #[test]
    fn test_cli_run_overrides() {
        let cli = Cli::try_parse_from(["liveview", "run", "--host", "0.0.0.0", "--port", "9000"])
            .unwrap();
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_cli_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["liveview", "token", "--config", "other.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Token)));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_load_config_missing_file_still_needs_secret() {
        // Defaults have no secret, which validation rejects for hs256.
        let result = load_config(Path::new("/nonexistent/liveview.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[auth]
secret = "0123456789abcdef0123456789abcdef"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[session]
inactivity_timeout_secs = 0

[auth]
secret = "0123456789abcdef0123456789abcdef"
"#
        )
        .unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
