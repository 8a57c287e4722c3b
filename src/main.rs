//! gojo CLI entry point
//!
//! Parses arguments, runs the selected command and renders failures as
//! user-friendly errors with a non-zero exit status.

use anyhow::Result;
use clap::Parser;
use gojo::cli;
use gojo::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
