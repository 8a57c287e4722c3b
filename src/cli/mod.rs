//! Command-line interface for gojo.
//!
//! Every image lives in its own directory under the images directory
//! (`--images-dir`, or `GOJO_IMAGES_DIR`) and holds a `.build.yaml` build
//! file next to its `Containerfile`.
//!
//! # Commands
//!
//! - `facts list|get` - resolve facts and compute the image tag
//! - `scaffold alpine|github|simple` - create a new image directory
//! - `build podman|buildah|buildkit|kaniko` - build the image
//! - `commit` - commit and push an updated build file
//! - `version` - print version information
//!
//! # Typical workflow
//!
//! ```bash
//! gojo scaffold alpine -i nginx --image-fqin registry.example.com/nginx:latest \
//!     --from-image alpine:3.13 -p nginx -r main --version-id 3.13
//! gojo facts get -i nginx
//! gojo build podman -i nginx --push --tag-latest
//! gojo commit -i nginx -n "Build Bot" -e bot@example.com
//! ```
//!
//! # Global options
//!
//! - `--verbose` - debug output
//! - `--quiet` - errors only
//! - `--log-level` - explicit level when neither of the above is set
//!
//! Logs go to stderr; stdout carries only command output. `RUST_LOG`
//! overrides the level chosen on the command line.

mod build;
pub mod common;
mod commit;
mod facts;
mod scaffold;
mod version;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

pub use commit::commit_message;
pub use version::VersionInfo;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level, or `None` when only errors should be shown.
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Installs the global tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let level = self.log_level.as_deref().unwrap_or("error");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "gojo",
    about = "Container image build orchestrator",
    version,
    long_about = "gojo resolves image facts from Alpine package indexes and GitHub, \
                  renders image tags and drives podman, buildah, BuildKit or kaniko."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log level
    #[arg(
        short,
        long,
        global = true,
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Facts(facts::FactsCommand),

    Scaffold(scaffold::ScaffoldCommand),

    Build(build::BuildCommand),

    Commit(commit::CommitCommand),

    Version(version::VersionCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some(self.log_level.clone())
        };

        CliConfig {
            log_level,
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Facts(cmd) => cmd.execute().await,
            Commands::Scaffold(cmd) => cmd.execute().await,
            Commands::Build(cmd) => cmd.execute().await,
            Commands::Commit(cmd) => cmd.execute().await,
            Commands::Version(cmd) => cmd.execute().await,
        }
    }
}
