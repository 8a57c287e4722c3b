//! `gojo scaffold`: create the build file and Containerfile of a new image.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use super::common::CommonOptions;
use crate::constants::{BUILDER_TARGET, TAG_FORMAT_VERSION, VERSION_FACT_NAME};
use crate::manifest::{Build, Fact, FactKind, FromImage, Image, Source};
use crate::templating::render_containerfile;
use crate::utils::ensure_dir;
use crate::utils::fs::write_text_file;

/// Scaffold a new image directory
#[derive(Args, Debug)]
pub struct ScaffoldCommand {
    #[command(subcommand)]
    kind: ScaffoldKind,
}

#[derive(Subcommand, Debug)]
enum ScaffoldKind {
    /// Image versioned by an Alpine package
    Alpine(AlpineArgs),
    /// Image versioned by GitHub releases
    Github(GitHubArgs),
    /// Image without a version source
    Simple(ScaffoldArgs),
}

#[derive(Args, Debug)]
struct ScaffoldArgs {
    #[command(flatten)]
    common: CommonOptions,

    /// Fully qualified name of the image to build
    #[arg(long)]
    image_fqin: String,

    /// Fully qualified name of the base image
    #[arg(long)]
    from_image: String,

    /// Fully qualified name of the builder stage image
    #[arg(long)]
    from_image_builder: Option<String>,
}

#[derive(Args, Debug)]
struct AlpineArgs {
    #[command(flatten)]
    scaffold: ScaffoldArgs,

    /// Alpine package providing the version
    #[arg(short = 'p', long)]
    pkg: String,

    /// Alpine repository holding the package (main, community, ...)
    #[arg(short = 'r', long)]
    repo: String,

    /// Alpine release branch, e.g. 3.13
    #[arg(long)]
    version_id: String,
}

#[derive(Args, Debug)]
struct GitHubArgs {
    #[command(flatten)]
    scaffold: ScaffoldArgs,

    /// Owner of the GitHub repository
    #[arg(short = 'o', long)]
    owner: String,

    /// GitHub repository
    #[arg(short = 'r', long)]
    repo: String,
}

impl ScaffoldArgs {
    fn new_build(&self) -> Result<Build> {
        let mut build = Build::new(&self.image_fqin, &self.from_image)?;
        if let Some(builder) = &self.from_image_builder {
            build
                .spec
                .from_images
                .push(FromImage::new(Image::from_fqin(builder)?, Some(BUILDER_TARGET.to_string())));
        }
        Ok(build)
    }
}

/// Binds a `VERSION` fact and build argument to `source`.
fn add_version_source(build: &mut Build, source: Source) {
    build.spec.facts.push(Fact::new(VERSION_FACT_NAME, Some(source.name.clone()), FactKind::Version));
    build.spec.build_args.push(VERSION_FACT_NAME.to_string());
    build.spec.tag_format = TAG_FORMAT_VERSION.to_string();
    build.spec.sources = vec![source];
}

impl ScaffoldCommand {
    pub async fn execute(self) -> Result<()> {
        let (args, build) = match self.kind {
            ScaffoldKind::Alpine(alpine) => {
                let mut build = alpine.scaffold.new_build()?;
                add_version_source(
                    &mut build,
                    Source::alpine("alpine", alpine.pkg, alpine.repo, alpine.version_id),
                );
                (alpine.scaffold, build)
            }
            ScaffoldKind::Github(github) => {
                let mut build = github.scaffold.new_build()?;
                add_version_source(&mut build, Source::github("github", github.owner, github.repo));
                (github.scaffold, build)
            }
            ScaffoldKind::Simple(simple) => {
                let build = simple.new_build()?;
                (simple, build)
            }
        };
        args.common.log_dry_run();

        build.validate_pre_process()?;
        let paths = args.common.paths()?;
        let manifest = build.encode()?;
        let containerfile = render_containerfile(&build)?;

        info!("Build file {}", paths.build_file.display());
        println!("{manifest}");
        info!("Containerfile {}", paths.containerfile.display());
        println!("{containerfile}");

        if args.common.dry_run {
            return Ok(());
        }

        ensure_dir(&paths.image_dir)?;
        build.write(&paths.build_file)?;
        write_text_file(&paths.containerfile, &containerfile)?;
        info!("Scaffolded image in {}", paths.image_dir.display());

        Ok(())
    }
}
