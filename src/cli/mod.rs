//! CLI module for axone-mcp.
//!
//! Subcommands:
//! - `serve stdio`: Run the MCP server (stdio transport)
//! - `serve http`: Run the MCP server (streamable HTTP transport)
//! - `version`: Print version information

mod http;
mod stdio;
mod version;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, GrpcOverrides, HttpOverrides, Overrides, TlsMode};
use crate::context::Context;
use crate::error::AppError;

pub use version::{OutputFormat, VersionInfo};

/// axone MCP server
#[derive(Parser)]
#[command(name = "axone-mcp")]
#[command(about = "MCP server exposing the dataverse contracts of an axone chain")]
#[command(version)]
pub struct App {
    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Auto, global = true)]
    pub log_format: LogFormat,

    /// Only expose read-only tools
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Explicit config file, read after the user and project files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the MCP using a specific transport
    Serve {
        #[command(flatten)]
        node: NodeArgs,

        #[command(subcommand)]
        transport: Transport,
    },

    /// Print the application binary version information
    Version {
        /// Print long version information
        #[arg(long)]
        long: bool,

        /// Output format of the long version
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum Transport {
    /// Serve the MCP over stdio (standard input/output)
    Stdio,

    /// Serve the MCP over streamable HTTP
    Http {
        /// Address to listen on, as host:port
        #[arg(long)]
        listen_addr: Option<String>,
    },
}

/// Connection flags shared by all transports.
#[derive(Args)]
pub struct NodeArgs {
    /// Address <host>:<port> of the gRPC endpoint exposed by the axone node
    #[arg(long, global = true)]
    pub node_grpc: Option<String>,

    /// Disable TLS when connecting to the gRPC endpoint
    #[arg(long, global = true)]
    pub grpc_no_tls: bool,

    /// Timeout for establishing the gRPC connection (e.g. 5s, 2m)
    #[arg(long, value_parser = humantime::parse_duration, global = true)]
    pub grpc_timeout: Option<Duration>,

    /// Address of the dataverse contract used by default
    #[arg(long, global = true)]
    pub dataverse_addr: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Console when stderr is a terminal, JSON otherwise
    Auto,
    Console,
    Json,
}

impl LogFormat {
    fn resolve(self) -> LogFormat {
        match self {
            LogFormat::Auto if std::io::stderr().is_terminal() => LogFormat::Console,
            LogFormat::Auto => LogFormat::Json,
            other => other,
        }
    }
}

impl App {
    /// Install the global tracing subscriber. Logs always go to stderr so the
    /// stdio transport keeps stdout for protocol messages.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_str()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match self.log_format.resolve() {
            LogFormat::Json => builder.json().init(),
            _ => builder.init(),
        }
    }

    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match &self.command {
            Command::Serve { node, transport } => {
                let listen_addr = match transport {
                    Transport::Http { listen_addr } => listen_addr.clone(),
                    Transport::Stdio => None,
                };
                let config = self.load_config(node, listen_addr)?;

                tracing::info!(endpoint = %config.grpc.endpoint, "Starting server");
                let ctx = Context::connect(config).await.map_err(AppError::from)?;

                match transport {
                    Transport::Stdio => stdio::run(ctx).await?,
                    Transport::Http { .. } => http::run(ctx).await?,
                }
                tracing::info!("Server stopped");
                Ok(())
            }
            Command::Version { long, output } => version::run(*long, *output),
        }
    }

    fn load_config(
        &self,
        node: &NodeArgs,
        listen_addr: Option<String>,
    ) -> Result<Config, AppError> {
        let overrides = Overrides {
            read_only: self.read_only.then_some(true),
            dataverse_address: node.dataverse_addr.clone(),
            grpc: GrpcOverrides {
                endpoint: node.node_grpc.clone(),
                tls: node.grpc_no_tls.then_some(TlsMode::Disabled),
                connect_timeout: node.grpc_timeout,
            },
            http: HttpOverrides { listen_addr },
        };

        Ok(Config::load(self.config.as_deref(), &overrides)?)
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
