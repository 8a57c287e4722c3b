//! Options shared by the image-scoped commands.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::constants::{
    DEFAULT_BUILD_FILE_NAME, DEFAULT_CONTAINERFILE_NAME, GITHUB_API_URL_ENV, GITHUB_DEFAULT_API_URL, GITHUB_TOKEN_ENV,
    IMAGES_DIR_ENV,
};
use crate::provider::ProviderOptions;
use crate::utils::resolve_path;

/// Selects one image directory and the files inside it.
#[derive(Args, Debug, Clone)]
pub struct CommonOptions {
    /// Log what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Name of the image directory
    #[arg(short, long)]
    pub image: String,

    /// Directory holding the image directories
    #[arg(short = 'd', long, env = IMAGES_DIR_ENV, default_value = ".")]
    pub images_dir: String,

    /// Build file name inside the image directory
    #[arg(short = 'f', long, default_value = DEFAULT_BUILD_FILE_NAME)]
    pub build_file: String,

    /// Containerfile name inside the image directory
    #[arg(short = 'c', long, default_value = DEFAULT_CONTAINERFILE_NAME)]
    pub containerfile: String,
}

/// Paths derived from [`CommonOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    pub image_dir: PathBuf,
    pub build_file: PathBuf,
    pub containerfile: PathBuf,
}

impl CommonOptions {
    /// Resolves the image directory, expanding `~` and environment
    /// variables in `--images-dir`.
    pub fn paths(&self) -> Result<ImagePaths> {
        let image_dir = resolve_path(&self.images_dir)?.join(&self.image);
        Ok(ImagePaths {
            build_file: image_dir.join(&self.build_file),
            containerfile: image_dir.join(&self.containerfile),
            image_dir,
        })
    }

    pub fn log_dry_run(&self) {
        if self.dry_run {
            info!("Dry run enabled, nothing will be changed");
        }
    }
}

/// GitHub access settings for fact resolution.
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// GitHub access token; raises API rate limits
    #[arg(long, env = GITHUB_TOKEN_ENV, hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = GITHUB_API_URL_ENV, default_value = GITHUB_DEFAULT_API_URL)]
    pub github_api_url: String,
}

impl ProviderArgs {
    #[must_use]
    pub fn options(&self) -> ProviderOptions {
        ProviderOptions::default()
            .with_github_token(self.github_token.clone())
            .with_github_api_url(self.github_api_url.clone())
    }
}
