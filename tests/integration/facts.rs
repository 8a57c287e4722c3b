use crate::common::{CommandOutput, TestProject};
use gojo::test_utils::{ApkIndexFixture, BuildFixture, apk_index_archive};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn alpine_mirror(index: &str) -> MockServer {
    let server = MockServer::start().await;
    let archive = apk_index_archive(&[("APKINDEX", index)]).unwrap();
    Mock::given(method("GET"))
        .and(path("/alpine/v3.13/main/x86_64/APKINDEX.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;
    server
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run(project: &TestProject, args: &[&str], env: Vec<(String, String)>) -> CommandOutput {
    let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    tokio::task::block_in_place(|| project.run_gojo_with_env(args, &env).unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_list_alpine() {
    let server = alpine_mirror(ApkIndexFixture::well_formed()).await;
    let project = TestProject::new().unwrap();
    project.write_build("nginx", &BuildFixture::alpine(&server.uri())).unwrap();
    let before = project.read_build("nginx").unwrap();

    let output = run(&project, &["facts", "list", "-i", "nginx"], Vec::new()).await;

    output
        .assert_success()
        .assert_stdout_contains("VERSION=1.18.0-r1")
        .assert_stdout_contains("registry.example.com/project/nginx:1.18.0-r1");
    assert_eq!(project.read_build("nginx").unwrap(), before, "list must not write the build file");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_get_writes_build_file() {
    let server = alpine_mirror(ApkIndexFixture::no_trailing_blank_line()).await;
    let project = TestProject::new().unwrap();
    project.write_build("nginx", &BuildFixture::alpine(&server.uri())).unwrap();

    run(&project, &["facts", "get", "-i", "nginx"], Vec::new()).await.assert_success();

    let build = gojo::manifest::Build::load(&project.build_file("nginx")).unwrap();
    assert_eq!(build.image().unwrap().tag, "1.18.0-r1");
    assert_eq!(build.find_fact("VERSION").unwrap().value, "1.18.0-r1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_get_dry_run_keeps_build_file() {
    let server = alpine_mirror(ApkIndexFixture::well_formed()).await;
    let project = TestProject::new().unwrap();
    project.write_build("nginx", &BuildFixture::alpine(&server.uri())).unwrap();
    let before = project.read_build("nginx").unwrap();

    run(&project, &["facts", "get", "-i", "nginx", "--dry-run"], Vec::new())
        .await
        .assert_success()
        .assert_stdout_contains("VERSION=1.18.0-r1");

    assert_eq!(project.read_build("nginx").unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_missing_package_fails() {
    let server = alpine_mirror("P:mariadb\nV:10.4.17-r1\nA:x86_64\n\n").await;
    let project = TestProject::new().unwrap();
    project.write_build("nginx", &BuildFixture::alpine(&server.uri())).unwrap();

    run(&project, &["facts", "list", "-i", "nginx"], Vec::new())
        .await
        .assert_failure()
        .assert_stderr_contains("nginx");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_github_tags_with_commit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/caddyserver/caddy/tags"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "v2.4.0-beta.1" },
            { "name": "v2.3.0" },
            { "name": "v2.2.1" }
        ])))
        .mount(&server)
        .await;

    let project = TestProject::new().unwrap();
    project.write_build("caddy", &BuildFixture::github_tags("caddyserver", "caddy")).unwrap();
    project.commit_all("add caddy").unwrap();
    let short = project.git().rev_parse_head().unwrap()[..8].to_string();

    let output = run(
        &project,
        &["facts", "list", "-i", "caddy"],
        vec![
            ("GOJO_GITHUB_API_URL".to_string(), server.uri()),
            ("GITHUB_TOKEN".to_string(), "secret".to_string()),
        ],
    )
    .await;

    output
        .assert_success()
        .assert_stdout_contains("VERSION=2.3.0")
        .assert_stdout_contains(&format!("registry.example.com/project/caddy:2.3.0-{short}"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_without_sources_is_noop() {
    let project = TestProject::new().unwrap();
    project.write_build("tools", &BuildFixture::static_only()).unwrap();
    let before = project.read_build("tools").unwrap();

    let output = run(&project, &["facts", "get", "-i", "tools"], Vec::new()).await;

    output.assert_success().assert_stderr_contains("no value sources defined");
    assert!(output.stdout.is_empty());
    assert_eq!(project.read_build("tools").unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_facts_missing_build_file() {
    let project = TestProject::new().unwrap();

    run(&project, &["facts", "list", "-i", "missing"], Vec::new())
        .await
        .assert_failure()
        .assert_stderr_contains("Build file not found");
}
