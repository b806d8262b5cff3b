mod common;

use std::process::{Command, Output};

use common::TempRepo;

fn commitlens(repo: &TempRepo, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .args(args)
        .current_dir(repo.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_MODEL")
        .env_remove("OPENAI_BASE_URL")
        .output()
        .unwrap()
}

#[test]
fn test_compare_raw_succeeds_without_api_key() {
    // Arrange
    let repo = TempRepo::with_feature_branch();

    // Act
    let output = commitlens(&repo, &["compare", "feature", "main", "--raw"]);

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("+BETA"));
    assert!(stdout.contains("Summary:"));
}

#[test]
fn test_compare_defaults_base_to_current_branch() {
    let repo = TempRepo::with_feature_branch();

    let output = commitlens(&repo, &["compare", "feature", "--preview"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Commits (2):"));
}

#[test]
fn test_summary_from_counts_commits_after_start() {
    // Arrange - two commits on top of the starting one
    let repo = TempRepo::new();
    repo.write("a.txt", "a\n");
    let start = repo.commit_all("Start");
    repo.write("a.txt", "a\nb\n");
    repo.commit_all("Second");
    repo.write("c.txt", "c\n");
    repo.commit_all("Third");
    let expected = repo.git(&["rev-list", "--count", &format!("{start}..HEAD")]);

    // Act
    let output = commitlens(&repo, &["summary", "--from", &start, "--raw"]);

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(expected, "2");
    assert!(stdout.contains("- 2 commits\n"));
    assert!(!stdout.contains("- 3 commits"));
}

#[test]
fn test_summary_from_head_hides_commit_line() {
    let repo = TempRepo::new();
    repo.write("a.txt", "a\n");
    let head = repo.commit_all("Only");

    let output = commitlens(&repo, &["summary", "--from", &head, "--raw"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No changes found."));
    assert!(!stdout.contains("commit"));
    assert!(stdout.contains("- 0 files changed"));
}

#[test]
fn test_blank_model_flag_rejected() {
    let repo = TempRepo::with_feature_branch();

    let output = commitlens(&repo, &["--model", "  ", "compare", "feature", "--preview"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("model"));
}

#[test]
fn test_summary_from_unknown_commit_exits_non_zero() {
    // Arrange
    let repo = TempRepo::new();
    repo.write("a.txt", "a\n");
    repo.commit_all("Initial commit");

    // Act
    let output = commitlens(
        &repo,
        &["summary", "--from", "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"],
    );

    // Assert - error on stderr, nothing on stdout
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist in history"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_summary_without_api_key_exits_non_zero() {
    let repo = TempRepo::new();
    repo.write("a.txt", "a\n");
    repo.commit_all("Initial commit");
    repo.write("a.txt", "b\n");

    let output = commitlens(&repo, &["summary"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"));
}

#[test]
fn test_raw_and_preview_conflict() {
    let repo = TempRepo::with_feature_branch();

    let output = commitlens(&repo, &["compare", "feature", "--raw", "--preview"]);

    assert!(!output.status.success());
}

#[test]
fn test_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .args(["summary", "--raw"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not in a git repository"));
}
