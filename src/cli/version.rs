//! `version` command.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Build information of the running binary.
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    /// Long form in the requested format.
    pub fn render(&self, output: OutputFormat) -> color_eyre::Result<String> {
        Ok(match output {
            OutputFormat::Json => serde_json::to_string(self)?,
            OutputFormat::Text => format!(
                "name: {}\nversion: {}\nos: {}\narch: {}",
                self.name, self.version, self.os, self.arch
            ),
        })
    }
}

pub fn run(long: bool, output: OutputFormat) -> color_eyre::Result<()> {
    let info = VersionInfo::current();
    if long {
        println!("{}", info.render(output)?);
    } else {
        println!("{}", info.version);
    }
    Ok(())
}
