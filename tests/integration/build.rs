use crate::common::TestProject;
use gojo::test_utils::BuildFixture;

fn project_with_tools() -> TestProject {
    let project = TestProject::new().unwrap();
    project.write_build("tools", &BuildFixture::static_only()).unwrap();
    project
}

#[test]
fn test_build_podman_dry_run() {
    let project = project_with_tools();

    let output = project.run_gojo(&["build", "podman", "-i", "tools", "--dry-run", "--push", "--tag-latest"]).unwrap();

    output
        .assert_success()
        .assert_stderr_contains("[dry-run] podman build -t registry.example.com/project/tools:1.0.0")
        .assert_stderr_contains("--build-arg FROM_IMAGE=docker.io/library/alpine:3.13")
        .assert_stderr_contains("--build-arg VERSION=1.0.0")
        .assert_stderr_contains(
            "[dry-run] podman tag registry.example.com/project/tools:1.0.0 registry.example.com/project/tools:latest",
        )
        .assert_stderr_contains("[dry-run] podman push registry.example.com/project/tools:latest");
}

#[test]
fn test_build_buildah_without_push() {
    let project = project_with_tools();

    let output = project.run_gojo(&["build", "buildah", "-i", "tools", "--dry-run"]).unwrap();

    output.assert_success().assert_stderr_contains("[dry-run] buildah bud -t registry.example.com/project/tools:1.0.0");
    assert!(!output.stderr.contains("buildah push"));
}

#[test]
fn test_build_buildkit_dry_run() {
    let project = project_with_tools();

    project
        .run_gojo(&["build", "buildkit", "-i", "tools", "--dry-run", "--addr", "tcp://buildkitd:1234", "--push"])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("[dry-run] buildctl --addr tcp://buildkitd:1234 build --frontend dockerfile.v0")
        .assert_stderr_contains("--output type=image,name=registry.example.com/project/tools:1.0.0,push=true");
}

#[test]
fn test_build_kaniko_dry_run() {
    let project = project_with_tools();

    project
        .run_gojo(&["build", "kaniko", "-i", "tools", "--dry-run"])
        .unwrap()
        .assert_success()
        .assert_stderr_contains("[dry-run] /kaniko/executor")
        .assert_stderr_contains("--destination registry.example.com/project/tools:1.0.0");
}

#[test]
fn test_build_requires_resolved_facts() {
    let project = TestProject::new().unwrap();
    project.write_build("nginx", &BuildFixture::alpine("http://127.0.0.1:9")).unwrap();

    project
        .run_gojo(&["build", "podman", "-i", "nginx", "--dry-run"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("empty fact value: VERSION");
}
