//! podman and buildah, which share the same command shape.

use std::collections::BTreeMap;

use super::{BuildOptions, BuildPaths, ExecTask};
use crate::manifest::Image;

pub(super) fn plan(
    program: &str,
    build_verb: &str,
    image: &Image,
    build_args: &BTreeMap<String, String>,
    paths: &BuildPaths,
    options: &BuildOptions,
) -> Vec<ExecTask> {
    let reference = image.reference();
    let latest = image.reference_latest();

    let mut build = ExecTask::new(program).args([build_verb, "-t", reference.as_str()]);
    for (name, value) in build_args {
        build = build.arg("--build-arg").arg(format!("{name}={value}"));
    }
    build = build
        .arg("-f")
        .arg(paths.containerfile.display().to_string())
        .arg(paths.context_dir.display().to_string());

    let mut tasks = vec![build];

    if options.tag_latest {
        tasks.push(ExecTask::new(program).args(["tag", reference.as_str(), latest.as_str()]));
    }

    if options.push {
        tasks.push(ExecTask::new(program).args(["push", reference.as_str()]));
        if options.tag_latest {
            tasks.push(ExecTask::new(program).args(["push", latest.as_str()]));
        }
    }

    tasks
}
