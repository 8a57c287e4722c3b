//! kaniko executor. It always pushes to its destination.

use std::collections::BTreeMap;

use super::{BuildOptions, BuildPaths, ExecTask};
use crate::manifest::Image;

const KANIKO_EXECUTOR: &str = "/kaniko/executor";

pub(super) fn plan(
    image: &Image,
    build_args: &BTreeMap<String, String>,
    paths: &BuildPaths,
    options: &BuildOptions,
) -> Vec<ExecTask> {
    let mut task = ExecTask::new(KANIKO_EXECUTOR);
    for (name, value) in build_args {
        task = task.arg("--build-arg").arg(format!("{name}={value}"));
    }
    // the cache lets the second run reuse the layers of the first
    task = task
        .arg("--cache=true")
        .arg("--context")
        .arg(paths.context_dir.display().to_string())
        .arg("--dockerfile")
        .arg(paths.containerfile.display().to_string());

    let mut tasks = vec![task.clone().arg("--destination").arg(image.reference())];
    if options.tag_latest {
        tasks.push(task.arg("--destination").arg(image.reference_latest()));
    }
    tasks
}
