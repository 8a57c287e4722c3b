//! Builder integrations.
//!
//! A manager turns a validated [`Build`] into the ordered list of external
//! commands that build, tag and push its image. Planning is pure; running
//! the plan executes each [`ExecTask`] in order and stops at the first
//! failure.
//!
//! | Manager  | Program            | Latest tag            | Push                 |
//! |----------|--------------------|-----------------------|----------------------|
//! | podman   | `podman`           | `podman tag`          | `podman push`        |
//! | buildah  | `buildah`          | `buildah tag`         | `buildah push`       |
//! | buildkit | `buildctl`         | second build          | `--output push=true` |
//! | kaniko   | `/kaniko/executor` | second `--destination`| always pushes        |

mod buildkit;
mod exec;
mod kaniko;
mod oci;

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

use crate::manifest::Build;

pub use buildkit::BuildkitOptions;
pub use exec::ExecTask;

/// Behaviour shared by every manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub push: bool,
    pub tag_latest: bool,
    pub dry_run: bool,
}

/// Locations a builder reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Build context; the image directory.
    pub context_dir: PathBuf,
    /// Full path of the Containerfile.
    pub containerfile: PathBuf,
}

/// Supported builder tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildManager {
    Podman,
    Buildah,
    Buildkit(BuildkitOptions),
    Kaniko,
}

impl BuildManager {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Podman => "podman",
            Self::Buildah => "buildah",
            Self::Buildkit(_) => "buildkit",
            Self::Kaniko => "kaniko",
        }
    }

    /// Commands building `build`, in execution order.
    ///
    /// Build arguments are passed sorted by name.
    ///
    /// # Errors
    ///
    /// Fails when the build has no image.
    pub fn plan(&self, build: &Build, paths: &BuildPaths, options: &BuildOptions) -> Result<Vec<ExecTask>> {
        let image = build.image()?;
        let build_args = build.build_args();

        let tasks = match self {
            Self::Podman => oci::plan("podman", "build", image, &build_args, paths, options),
            Self::Buildah => oci::plan("buildah", "bud", image, &build_args, paths, options),
            Self::Buildkit(buildkit) => buildkit::plan(buildkit, image, &build_args, paths, options),
            Self::Kaniko => kaniko::plan(image, &build_args, paths, options),
        };
        Ok(tasks)
    }

    /// Plans and runs the build.
    pub async fn run(&self, build: &Build, paths: &BuildPaths, options: &BuildOptions) -> Result<()> {
        let tasks = self.plan(build, paths, options)?;
        info!("Building {} with {} ({} step(s))", build.image()?, self, tasks.len());

        for task in &tasks {
            task.execute(options.dry_run).await?;
        }
        Ok(())
    }
}

impl fmt::Display for BuildManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
