use crate::common::TestProject;
use gojo::manifest::{Build, FactKind};
use std::fs;

const IMAGE_FQIN: &str = "registry.example.com/project/nginx:latest";
const FROM_IMAGE: &str = "docker.io/library/alpine:3.13";

#[test]
fn test_scaffold_alpine() {
    let project = TestProject::new().unwrap();

    let output = project
        .run_gojo(&[
            "scaffold",
            "alpine",
            "-i",
            "nginx",
            "--image-fqin",
            IMAGE_FQIN,
            "--from-image",
            FROM_IMAGE,
            "-p",
            "nginx",
            "-r",
            "main",
            "--version-id",
            "3.13",
        ])
        .unwrap();
    output.assert_success().assert_stdout_contains("tagFormat");

    let build = Build::load(&project.build_file("nginx")).unwrap();
    let image = build.image().unwrap();
    assert_eq!(image.registry, "registry.example.com/project");
    assert_eq!(image.name, "nginx");
    assert_eq!(build.spec.build_args, vec!["VERSION".to_string()]);
    assert_eq!(build.spec.tag_format, "{{ .VERSION }}");

    let fact = build.find_fact("VERSION").unwrap();
    assert_eq!(fact.kind, FactKind::Version);
    assert_eq!(fact.source.as_deref(), Some("alpine"));

    let alpine = build.find_source("alpine").unwrap().alpine.as_ref().unwrap();
    assert_eq!(alpine.package, "nginx");
    assert_eq!(alpine.repository, "main");
    assert_eq!(alpine.version_id, "3.13");

    let containerfile = fs::read_to_string(project.image_path("nginx").join("Containerfile")).unwrap();
    assert!(containerfile.contains(r#"RUN apk add --no-cache "nginx~=${VERSION}""#));
}

#[test]
fn test_scaffold_github_with_builder() {
    let project = TestProject::new().unwrap();

    project
        .run_gojo(&[
            "scaffold",
            "github",
            "-i",
            "caddy",
            "--image-fqin",
            "registry.example.com/project/caddy:latest",
            "--from-image",
            FROM_IMAGE,
            "--from-image-builder",
            "docker.io/library/golang:1.16",
            "-o",
            "caddyserver",
            "-r",
            "caddy",
        ])
        .unwrap()
        .assert_success();

    let build = Build::load(&project.build_file("caddy")).unwrap();
    assert_eq!(build.spec.from_images.len(), 2);
    assert_eq!(build.spec.from_images[1].target.as_deref(), Some("builder"));
    assert_eq!(build.find_source("github").unwrap().github.as_ref().unwrap().owner, "caddyserver");

    let containerfile = fs::read_to_string(project.image_path("caddy").join("Containerfile")).unwrap();
    assert!(containerfile.contains("FROM ${FROM_IMAGE_BUILDER} AS builder"));
    assert!(containerfile.contains("https://github.com/caddyserver/caddy/archive/v${VERSION}.tar.gz"));
    assert!(containerfile.contains("COPY --from=builder /go/bin/caddy /usr/local/bin/caddy"));
}

#[test]
fn test_scaffold_simple_dry_run() {
    let project = TestProject::new().unwrap();

    let output = project
        .run_gojo(&[
            "scaffold",
            "simple",
            "-i",
            "tools",
            "--image-fqin",
            "registry.example.com/project/tools:1.0.0",
            "--from-image",
            FROM_IMAGE,
            "--dry-run",
        ])
        .unwrap();

    output.assert_success().assert_stdout_contains("name: tools").assert_stdout_contains("FROM ${FROM_IMAGE}");
    assert!(!project.image_path("tools").exists());
}

#[test]
fn test_scaffold_rejects_bad_fqin() {
    let project = TestProject::new().unwrap();

    project
        .run_gojo(&["scaffold", "simple", "-i", "tools", "--image-fqin", "nginx", "--from-image", FROM_IMAGE])
        .unwrap()
        .assert_failure();
    assert!(!project.image_path("tools").exists());
}
