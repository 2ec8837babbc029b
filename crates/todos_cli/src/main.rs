//! Server entry point.
//!
//! # Responsibility
//! - Resolve configuration and start logging before touching the database.
//! - Serve the todos REST API until the process is stopped.
//!
//! Command-line flags override the matching `TODOS_*` environment variables.

use clap::Parser;
use log::error;
use std::net::SocketAddr;
use std::process::ExitCode;
use todos_api::{AppState, DbLocation, ServerConfig};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "todos")]
#[command(about = "Todo list REST service backed by SQLite")]
#[command(version)]
struct Cli {
    /// Listen address, e.g. 127.0.0.1:3000 (overrides TODOS_BIND_ADDR)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// SQLite file path, or `:memory:` (overrides TODOS_DB_PATH)
    #[arg(long)]
    db: Option<String>,

    /// trace|debug|info|warn|error (overrides TODOS_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(db) = self.db {
            config.db = DbLocation::from_setting(&db);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ServerConfig::from_env() {
        Ok(config) => cli.apply(config),
        Err(err) => {
            eprintln!("todos: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = config.log_dir.to_string_lossy();
    if let Err(err) = todos_core::init_logging(&config.log_level, &log_dir) {
        eprintln!("todos: {err}");
        return ExitCode::FAILURE;
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::open(&config.db)?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    todos_api::run(listener, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use todos_api::{DbLocation, ServerConfig};

    fn env_config() -> ServerConfig {
        ServerConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn flags_override_environment_values() {
        let cli = Cli::try_parse_from([
            "todos",
            "--bind",
            "0.0.0.0:8080",
            "--db",
            ":memory:",
            "--log-level",
            "warn",
        ])
        .unwrap();

        let config = cli.apply(env_config());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db, DbLocation::Memory);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn no_flags_keep_environment_values() {
        let cli = Cli::try_parse_from(["todos"]).unwrap();
        assert_eq!(cli.apply(env_config()), env_config());
    }

    #[test]
    fn invalid_bind_flag_is_rejected() {
        assert!(Cli::try_parse_from(["todos", "--bind", "localhost"]).is_err());
    }

    #[test]
    fn version_flag_is_handled_by_clap() {
        let err = Cli::try_parse_from(["todos", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
