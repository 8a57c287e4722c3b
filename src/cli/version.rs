//! `gojo version`: print build information as JSON.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

/// Print version information
#[derive(Args, Debug)]
pub struct VersionCommand {}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

impl VersionInfo {
    #[must_use]
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

impl VersionCommand {
    pub async fn execute(self) -> Result<()> {
        let json = serde_json::to_string_pretty(&VersionInfo::current())
            .context("Failed to serialize version information")?;
        println!("{json}");
        Ok(())
    }
}
