//! `gojo build <manager>`: build an image from its build file.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::warn;

use super::common::CommonOptions;
use crate::constants::DEFAULT_BUILDKIT_FRONTEND;
use crate::manager::{BuildManager, BuildOptions, BuildPaths, BuildkitOptions};
use crate::manifest::Build;
use crate::utils::command_exists;

/// Build an image with one of the supported builders
#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(subcommand)]
    manager: ManagerKind,
}

#[derive(Subcommand, Debug)]
enum ManagerKind {
    /// Build with podman
    Podman(BuildArgs),
    /// Build with buildah
    Buildah(BuildArgs),
    /// Build with a BuildKit daemon through buildctl
    Buildkit(BuildkitArgs),
    /// Build inside a kaniko executor container
    Kaniko(BuildArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    common: CommonOptions,

    /// Push the image after building
    #[arg(long)]
    push: bool,

    /// Also tag the image as latest
    #[arg(long)]
    tag_latest: bool,
}

#[derive(Args, Debug)]
struct BuildkitArgs {
    #[command(flatten)]
    build: BuildArgs,

    /// BuildKit frontend
    #[arg(long, default_value = DEFAULT_BUILDKIT_FRONTEND)]
    frontend: String,

    /// buildkitd address
    #[arg(long, env = "BUILDKIT_HOST")]
    addr: Option<String>,

    /// Server name used for TLS verification
    #[arg(long)]
    tls_server_name: Option<String>,

    /// CA certificate used for TLS verification
    #[arg(long)]
    tls_ca_cert: Option<String>,

    /// Client certificate
    #[arg(long)]
    tls_cert: Option<String>,

    /// Client key
    #[arg(long)]
    tls_key: Option<String>,

    /// Directory holding ca.pem, cert.pem and key.pem
    #[arg(long)]
    tls_dir: Option<String>,
}

impl BuildkitArgs {
    fn options(&self) -> BuildkitOptions {
        BuildkitOptions {
            frontend: self.frontend.clone(),
            addr: self.addr.clone(),
            tls_server_name: self.tls_server_name.clone(),
            tls_ca_cert: self.tls_ca_cert.clone(),
            tls_cert: self.tls_cert.clone(),
            tls_key: self.tls_key.clone(),
            tls_dir: self.tls_dir.clone(),
        }
    }
}

/// Executable a manager shells out to, for the availability warning.
fn program_of(manager: &BuildManager) -> &'static str {
    match manager {
        BuildManager::Podman => "podman",
        BuildManager::Buildah => "buildah",
        BuildManager::Buildkit(_) => "buildctl",
        BuildManager::Kaniko => "/kaniko/executor",
    }
}

impl BuildCommand {
    pub async fn execute(self) -> Result<()> {
        let (manager, args) = match self.manager {
            ManagerKind::Podman(args) => (BuildManager::Podman, args),
            ManagerKind::Buildah(args) => (BuildManager::Buildah, args),
            ManagerKind::Buildkit(buildkit) => (BuildManager::Buildkit(buildkit.options()), buildkit.build),
            ManagerKind::Kaniko(args) => (BuildManager::Kaniko, args),
        };
        args.common.log_dry_run();

        let paths = args.common.paths()?;
        let build = Build::load(&paths.build_file)?;
        build.validate()?;

        let program = program_of(&manager);
        if !args.common.dry_run && !command_exists(program) {
            warn!("'{}' was not found on PATH, the build will likely fail", program);
        }

        let options = BuildOptions {
            push: args.push,
            tag_latest: args.tag_latest,
            dry_run: args.common.dry_run,
        };
        let build_paths = BuildPaths {
            context_dir: paths.image_dir,
            containerfile: paths.containerfile,
        };

        manager.run(&build, &build_paths, &options).await
    }
}
