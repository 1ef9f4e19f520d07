//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/axone-mcp/config.toml` (XDG) or platform config dir
//! 3. Project config: `./axone-mcp.toml`
//! 4. Explicit file given with `--config`
//! 5. Environment variables: `AXONE_MCP_*` (`__` separates sections)
//! 6. Command line flags
//!
//! ```toml
//! read_only = true
//! dataverse_address = "axone1xt4ahzz2x8hpkc0tk6ekte9x6crw4w6u0r67cyt3kz9syh24pd7scvlt2w"
//!
//! [grpc]
//! endpoint = "grpc.axone.xyz:443"
//! tls = "enabled"
//! connect_timeout = "5s"
//! request_timeout = "30s"
//!
//! [resolver]
//! multiple_bindings = "first"
//!
//! [http]
//! listen_addr = "127.0.0.1:8081"
//! ```

pub mod duration_format;

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::mcp::AccessMode;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AXONE_MCP_";

/// Project config file, looked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "axone-mcp.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Only advertise and accept tools flagged read-only.
    pub read_only: bool,
    /// Dataverse used by tools that don't take one as argument.
    pub dataverse_address: Option<String>,
    pub grpc: GrpcConfig,
    pub resolver: ResolverConfig,
    pub http: HttpConfig,
}

/// Connection to the axone node gRPC endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    /// `host:port` of the node (a `http://` or `https://` scheme is kept as given).
    pub endpoint: String,
    pub tls: TlsMode,
    /// Timeout for establishing the connection.
    #[serde(with = "duration_format")]
    pub connect_timeout: Duration,
    /// Deadline applied to every contract query.
    #[serde(with = "duration_format")]
    pub request_timeout: Duration,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:9090".to_string(),
            tls: TlsMode::Enabled,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub multiple_bindings: MultipleBindings,
}

/// What to do when the governance lookup returns more than one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleBindings {
    /// Use the first row.
    #[default]
    First,
    /// Fail the resolution.
    Reject,
}

/// Streamable HTTP transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers untouched.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataverse_address: Option<String>,
    pub grpc: GrpcOverrides,
    pub http: HttpOverrides,
}

#[derive(Debug, Default, Serialize)]
pub struct GrpcOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsMode>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "duration_format::option::serialize"
    )]
    pub connect_timeout: Option<Duration>,
}

#[derive(Debug, Default, Serialize)]
pub struct HttpOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_addr: Option<String>,
}

impl Config {
    /// Load config with layered resolution (defaults → files → env → flags).
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Toml::file(Self::user_config_path()))
            .merge(Toml::file(PROJECT_CONFIG_FILE));

        if let Some(path) = path {
            if !path.exists() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))
                .into());
            }
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Access policy applied to the tool set.
    pub fn access_mode(&self) -> AccessMode {
        if self.read_only {
            AccessMode::ReadOnly
        } else {
            AccessMode::ReadWrite
        }
    }

    /// User config path: ~/.config/axone-mcp/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("axone-mcp").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("axone-mcp").join("config.toml"))
            .unwrap_or_default()
    }
}
