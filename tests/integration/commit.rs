use crate::common::TestProject;
use gojo::test_utils::{BuildFixture, TestGit};
use tempfile::TempDir;

const AUTHOR_ARGS: [&str; 4] = ["-n", "Build Bot", "-e", "bot@example.com"];

/// A project whose branch tracks a bare remote.
fn project_with_remote() -> (TestProject, TempDir) {
    let remote_dir = TempDir::new().unwrap();
    TestGit::new(remote_dir.path()).init_bare().unwrap();

    let project = TestProject::new().unwrap();
    project.git().remote_add("origin", &remote_dir.path().display().to_string()).unwrap();
    project.git().push_upstream("origin").unwrap();
    (project, remote_dir)
}

fn commit_args<'a>(image: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["commit", "-i", image];
    args.extend(AUTHOR_ARGS);
    args.extend(extra);
    args
}

#[test]
fn test_commit_and_push_build_file() {
    let (project, remote_dir) = project_with_remote();
    project.write_build("tools", &BuildFixture::static_only()).unwrap();

    project.run_gojo(&commit_args("tools", &[])).unwrap().assert_success();

    let git = project.git();
    assert_eq!(git.last_commit_message().unwrap(), "[gojo] New build file, image=tools, tag=1.0.0");
    assert_eq!(git.commit_count().unwrap(), 2);
    assert!(git.status_porcelain().unwrap().is_empty());
    assert_eq!(TestGit::new(remote_dir.path()).rev_parse_head().unwrap(), git.rev_parse_head().unwrap());
}

#[test]
fn test_commit_unchanged_build_file() {
    let (project, _remote_dir) = project_with_remote();
    project.write_build("tools", &BuildFixture::static_only()).unwrap();
    project.commit_all("add tools").unwrap();

    project
        .run_gojo(&commit_args("tools", &[]))
        .unwrap()
        .assert_success()
        .assert_stderr_contains("nothing to commit");
    assert_eq!(project.git().commit_count().unwrap(), 2);
}

#[test]
fn test_commit_dry_run() {
    let (project, _remote_dir) = project_with_remote();
    project.write_build("tools", &BuildFixture::static_only()).unwrap();

    project
        .run_gojo(&commit_args("tools", &["--dry-run"]))
        .unwrap()
        .assert_success()
        .assert_stderr_contains("[dry-run] Would commit");

    assert_eq!(project.git().commit_count().unwrap(), 1);
    assert!(!project.git().status_porcelain().unwrap().is_empty());
}

#[test]
fn test_commit_missing_build_file() {
    let project = TestProject::new().unwrap();

    project
        .run_gojo(&commit_args("missing", &[]))
        .unwrap()
        .assert_success()
        .assert_stderr_contains("does not exist");
}
