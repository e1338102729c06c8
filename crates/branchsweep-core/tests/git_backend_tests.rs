//! Integration tests against real git repositories

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use branchsweep_core::{
    GitCli, RepositoryBackend, SweepError, classify, delete_branches, detect_merged,
    detect_squashed, is_squash_merged, recent_branches, resolve_default_branch, switch_branch,
};

/// Run git in `repo`, panicking with stderr on failure
fn git(repo: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Commit a file write with a fixed committer date
fn commit_file(repo: &Path, file: &str, content: &str, date: &str) {
    std::fs::write(repo.join(file), content).expect("failed to write file");
    git(repo, &["add", file]);
    let output = Command::new("git")
        .args(["commit", "-m", &format!("update {}", file)])
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .current_dir(repo)
        .output()
        .expect("failed to run git commit");
    assert!(
        output.status.success(),
        "git commit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Create a repository on `main` with one commit
fn setup_test_repo() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let repo = temp.path();

    git(repo, &["init", "-b", "main"]);
    git(repo, &["config", "user.email", "test@example.com"]);
    git(repo, &["config", "user.name", "Test User"]);
    git(repo, &["config", "commit.gpgsign", "false"]);
    commit_file(repo, "README.md", "hello\n", "2026-01-01T10:00:00+00:00");

    temp
}

/// `feature` squash-merged into main, `feature2` left open
fn setup_squash_repo() -> tempfile::TempDir {
    let temp = setup_test_repo();
    let repo = temp.path();

    git(repo, &["checkout", "-b", "feature"]);
    commit_file(repo, "a.txt", "one\n", "2026-01-02T10:00:00+00:00");
    commit_file(repo, "a.txt", "one\ntwo\n", "2026-01-03T10:00:00+00:00");

    git(repo, &["checkout", "main"]);
    git(repo, &["checkout", "-b", "feature2"]);
    commit_file(repo, "c.txt", "never merged\n", "2026-01-04T10:00:00+00:00");

    git(repo, &["checkout", "main"]);
    commit_file(repo, "CHANGELOG.md", "unrelated\n", "2026-01-05T10:00:00+00:00");
    git(repo, &["merge", "--squash", "feature"]);
    git(repo, &["commit", "-m", "Squashed feature"]);

    temp
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_discover_finds_top_level() {
    let temp = setup_test_repo();
    let nested = temp.path().join("nested");
    std::fs::create_dir(&nested).unwrap();

    let git_cli = GitCli::discover(&nested).expect("discover should succeed");
    assert_eq!(
        git_cli.repo_root().canonicalize().unwrap(),
        temp.path().canonicalize().unwrap()
    );
}

#[test]
fn test_default_branch_fallback_without_remote() {
    let temp = setup_test_repo();
    let git_cli = GitCli::new(temp.path());
    let branch = resolve_default_branch(&git_cli, "origin", &names(&["main", "master"])).unwrap();
    assert_eq!(branch, "main");
}

#[test]
fn test_default_branch_from_remote_head() {
    let temp = setup_test_repo();
    let repo = temp.path();
    git(repo, &["update-ref", "refs/remotes/origin/trunk", "HEAD"]);
    git(
        repo,
        &["symbolic-ref", "refs/remotes/origin/HEAD", "refs/remotes/origin/trunk"],
    );

    let git_cli = GitCli::new(repo);
    let branch = resolve_default_branch(&git_cli, "origin", &names(&["main", "master"])).unwrap();
    assert_eq!(branch, "trunk");
}

#[test]
fn test_default_branch_unresolvable() {
    let temp = setup_test_repo();
    let git_cli = GitCli::new(temp.path());
    let err = resolve_default_branch(&git_cli, "origin", &names(&["develop"])).unwrap_err();
    assert!(matches!(err, SweepError::DefaultBranchNotFound { .. }));
}

#[test]
fn test_fast_forward_detected_by_merge_detector() {
    let temp = setup_test_repo();
    let repo = temp.path();
    git(repo, &["checkout", "-b", "feature"]);
    commit_file(repo, "a.txt", "a\n", "2026-01-02T10:00:00+00:00");
    git(repo, &["checkout", "main"]);
    git(repo, &["merge", "--ff-only", "feature"]);

    let git_cli = GitCli::new(repo);
    let merged = detect_merged(&git_cli, "main").unwrap();
    assert_eq!(merged, vec!["feature", "main"]);
}

#[test]
fn test_squash_merge_detected() {
    let temp = setup_squash_repo();
    let git_cli = GitCli::new(temp.path());

    let merged = detect_merged(&git_cli, "main").unwrap();
    assert!(!merged.contains(&"feature".to_string()));

    let squashed = detect_squashed(&git_cli, "main", &names(&["feature"]), 1).unwrap();
    assert_eq!(squashed, vec!["feature"]);

    let squashed = detect_squashed(&git_cli, "main", &names(&["feature2"]), 1).unwrap();
    assert!(squashed.is_empty());
}

#[test]
fn test_squash_check_leaves_refs_untouched() {
    let temp = setup_squash_repo();
    let repo = temp.path();
    let before = git(repo, &["for-each-ref"]);

    let git_cli = GitCli::new(repo);
    detect_squashed(&git_cli, "main", &names(&["feature", "feature2"]), 2).unwrap();

    assert_eq!(git(repo, &["for-each-ref"]), before);
}

#[test]
fn test_classify_end_to_end() {
    let temp = setup_squash_repo();
    let repo = temp.path();
    git(repo, &["branch", "merged-ff", "main"]);

    let git_cli = GitCli::new(repo).with_timeout(Some(Duration::from_secs(60)));
    let result = classify(&git_cli, "main", 1).unwrap();
    assert_eq!(result.names(), vec!["merged-ff", "feature"]);
    assert!(result.warnings().is_empty());

    // Standing on a purgeable branch keeps it out of the candidates
    git(repo, &["checkout", "feature"]);
    let result = classify(&git_cli, "main", 1).unwrap();
    assert_eq!(result.names(), vec!["merged-ff"]);
}

#[test]
fn test_timeout_kills_git_call() {
    let temp = setup_squash_repo();
    let git_cli = GitCli::new(temp.path()).with_timeout(Some(Duration::from_nanos(1)));

    let err = git_cli.list_all_branches().unwrap_err();
    assert!(matches!(err, SweepError::GitTimeout { .. }), "got: {:?}", err);
    assert_eq!(err.code(), "E012");

    // A timed-out squash check counts as not squashed
    assert!(is_squash_merged(&git_cli, "main", "feature").is_err());
    let untimed = GitCli::new(temp.path());
    assert!(is_squash_merged(&untimed, "main", "feature").unwrap());
}

#[test]
fn test_classify_is_idempotent() {
    let temp = setup_squash_repo();
    let git_cli = GitCli::new(temp.path());
    let first = classify(&git_cli, "main", 1).unwrap();
    let second = classify(&git_cli, "main", 4).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_branch_names_with_unusual_characters() {
    let temp = setup_squash_repo();
    let repo = temp.path();
    git(repo, &["branch", "user/fix#12;echo", "main"]);

    let git_cli = GitCli::new(repo);
    let result = classify(&git_cli, "main", 1).unwrap();
    assert!(result.names().contains(&"user/fix#12;echo".to_string()));

    delete_branches(&git_cli, &names(&["user/fix#12;echo"])).unwrap();
    assert!(!git_cli.ref_exists("user/fix#12;echo"));
}

#[test]
fn test_delete_empty_is_noop() {
    let temp = setup_test_repo();
    let git_cli = GitCli::new(temp.path());
    delete_branches(&git_cli, &[]).unwrap();
}

#[test]
fn test_delete_missing_branch_carries_diagnostic() {
    let temp = setup_test_repo();
    let git_cli = GitCli::new(temp.path());
    let err = delete_branches(&git_cli, &names(&["x"])).unwrap_err();
    match err {
        SweepError::DeletionFailed(text) => assert!(text.contains("'x'"), "got: {}", text),
        other => panic!("expected DeletionFailed, got {:?}", other),
    }
}

#[test]
fn test_delete_unmerged_branch_is_forced() {
    let temp = setup_squash_repo();
    let git_cli = GitCli::new(temp.path());
    delete_branches(&git_cli, &names(&["feature", "feature2"])).unwrap();
    assert_eq!(git_cli.list_all_branches().unwrap(), vec!["main"]);
}

#[test]
fn test_recent_branches_newest_first() {
    let temp = setup_test_repo();
    let repo = temp.path();
    for (branch, date) in [
        ("older", "2026-02-01T10:00:00+00:00"),
        ("newest", "2026-02-03T10:00:00+00:00"),
        ("middle", "2026-02-02T10:00:00+00:00"),
    ] {
        git(repo, &["checkout", "-b", branch, "main"]);
        commit_file(repo, &format!("{}.txt", branch), branch, date);
    }

    let git_cli = GitCli::new(repo);
    let recent = recent_branches(&git_cli).unwrap();
    let ordered: Vec<(&str, Option<&str>)> = recent
        .iter()
        .map(|b| (b.name.as_str(), b.last_commit_date.as_deref()))
        .collect();
    assert_eq!(
        ordered,
        vec![
            ("newest", Some("2026-02-03")),
            ("middle", Some("2026-02-02")),
            ("older", Some("2026-02-01")),
            ("main", Some("2026-01-01")),
        ]
    );
}

#[test]
fn test_switch_branch() {
    let temp = setup_squash_repo();
    let git_cli = GitCli::new(temp.path());
    switch_branch(&git_cli, "feature2").unwrap();
    assert_eq!(git_cli.current_branch().unwrap(), "feature2");

    let err = switch_branch(&git_cli, "does-not-exist").unwrap_err();
    assert!(matches!(err, SweepError::SwitchFailed { .. }));
}
