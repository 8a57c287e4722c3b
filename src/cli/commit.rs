//! `gojo commit`: commit and push an updated build file.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use super::common::CommonOptions;
use crate::git::GitRepo;
use crate::manifest::Build;

/// Commit the build file of an image and push it upstream
#[derive(Args, Debug)]
pub struct CommitCommand {
    #[command(flatten)]
    common: CommonOptions,

    /// Commit author name
    #[arg(short = 'n', long)]
    name: String,

    /// Commit author email
    #[arg(short = 'e', long)]
    email: String,
}

/// Commit message recording the image reference in the build file.
#[must_use]
pub fn commit_message(name: &str, tag: &str) -> String {
    format!("[gojo] New build file, image={name}, tag={tag}")
}

impl CommitCommand {
    pub async fn execute(self) -> Result<()> {
        self.common.log_dry_run();
        let paths = self.common.paths()?;

        if !paths.build_file.exists() {
            warn!("Build file {} does not exist, nothing to commit", paths.build_file.display());
            return Ok(());
        }

        let build = Build::load(&paths.build_file)?;
        let image = build.image()?;

        let repo = GitRepo::new(&paths.image_dir);
        let file = std::path::Path::new(&self.common.build_file);
        if !repo.file_changed(file).await? {
            info!("Build file {} is unchanged, nothing to commit", paths.build_file.display());
            return Ok(());
        }

        let message = commit_message(&image.name, &image.tag);
        let author = format!("{} <{}>", self.name, self.email);

        if self.common.dry_run {
            info!("[dry-run] Would commit {} as '{}': {}", paths.build_file.display(), author, message);
            info!("[dry-run] Would push to upstream");
            return Ok(());
        }

        repo.add(file).await?;
        repo.commit(&message, Some(&author)).await?;
        info!("Committed {}", paths.build_file.display());

        repo.push().await?;
        info!("Pushed {}", image);
        Ok(())
    }
}
