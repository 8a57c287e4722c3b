//! BuildKit through `buildctl`.

use std::collections::BTreeMap;

use super::{BuildOptions, BuildPaths, ExecTask};
use crate::constants::{DEFAULT_BUILDKIT_FRONTEND, DEFAULT_CONTAINERFILE_NAME};
use crate::manifest::Image;

/// Connection settings for the BuildKit daemon, passed as global
/// `buildctl` flags when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildkitOptions {
    pub frontend: String,
    pub addr: Option<String>,
    pub tls_server_name: Option<String>,
    pub tls_ca_cert: Option<String>,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
    pub tls_dir: Option<String>,
}

impl Default for BuildkitOptions {
    fn default() -> Self {
        Self {
            frontend: DEFAULT_BUILDKIT_FRONTEND.to_string(),
            addr: None,
            tls_server_name: None,
            tls_ca_cert: None,
            tls_cert: None,
            tls_key: None,
            tls_dir: None,
        }
    }
}

pub(super) fn plan(
    buildkit: &BuildkitOptions,
    image: &Image,
    build_args: &BTreeMap<String, String>,
    paths: &BuildPaths,
    options: &BuildOptions,
) -> Vec<ExecTask> {
    let containerfile_name = paths
        .containerfile
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CONTAINERFILE_NAME.to_string());
    let containerfile_dir = paths
        .containerfile
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(paths.context_dir.as_path());

    let mut task = ExecTask::new("buildctl")
        .opt_flag("--addr", buildkit.addr.as_deref())
        .opt_flag("--tlsservername", buildkit.tls_server_name.as_deref())
        .opt_flag("--tlscacert", buildkit.tls_ca_cert.as_deref())
        .opt_flag("--tlscert", buildkit.tls_cert.as_deref())
        .opt_flag("--tlskey", buildkit.tls_key.as_deref())
        .opt_flag("--tlsdir", buildkit.tls_dir.as_deref())
        .args(["build", "--frontend", buildkit.frontend.as_str()])
        .arg("--opt")
        .arg(format!("filename={containerfile_name}"))
        .arg("--local")
        .arg(format!("context={}", paths.context_dir.display()))
        .arg("--local")
        .arg(format!("dockerfile={}", containerfile_dir.display()));

    for (name, value) in build_args {
        task = task.arg("--opt").arg(format!("build-arg:{name}={value}"));
    }

    let output = |reference: &str| format!("type=image,name={reference},push={}", options.push);

    let mut tasks = vec![task.clone().arg("--output").arg(output(&image.reference()))];
    if options.tag_latest {
        tasks.push(task.arg("--output").arg(output(&image.reference_latest())));
    }
    tasks
}
