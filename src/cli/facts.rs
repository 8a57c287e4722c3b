//! `gojo facts list|get`: resolve facts and compute the image tag.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::{info, warn};

use super::common::{CommonOptions, ProviderArgs};
use crate::facts::FactResolver;
use crate::manifest::Build;
use crate::templating::compute_tag;

/// Resolve facts from their sources and compute the image tag
#[derive(Args, Debug)]
pub struct FactsCommand {
    #[command(subcommand)]
    action: FactsAction,
}

#[derive(Subcommand, Debug)]
enum FactsAction {
    /// Print the resolved facts and image reference
    List(FactsArgs),
    /// Resolve facts and write them back to the build file
    Get(FactsArgs),
}

#[derive(Args, Debug)]
struct FactsArgs {
    #[command(flatten)]
    common: CommonOptions,

    #[command(flatten)]
    provider: ProviderArgs,
}

impl FactsCommand {
    pub async fn execute(self) -> Result<()> {
        let (args, write_back) = match self.action {
            FactsAction::List(args) => (args, false),
            FactsAction::Get(args) => (args, true),
        };
        args.common.log_dry_run();

        let paths = args.common.paths()?;
        let mut build = Build::load(&paths.build_file)?;

        if build.spec.sources.is_empty() {
            warn!("no value sources defined, nothing to do");
            return Ok(());
        }

        FactResolver::new(args.provider.options()).resolve(&mut build).await?;

        let tag = compute_tag(&build).await?;
        build.image_mut()?.tag = tag;

        for fact in &build.spec.facts {
            println!("{}={}", fact.name, fact.value);
        }
        println!("{}", build.image()?.reference());

        if !write_back {
            return Ok(());
        }
        if args.common.dry_run {
            info!("[dry-run] Not writing {}", paths.build_file.display());
            return Ok(());
        }

        build.write(&paths.build_file)?;
        info!("Updated {}", paths.build_file.display());
        Ok(())
    }
}
