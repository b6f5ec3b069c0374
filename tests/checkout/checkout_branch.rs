use crate::common::command::{commit_file, init_repository_dir, run_sprig_command, sprig_add};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn checkout_branch(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "feature.txt", "feature\n", "Feature work");
    commit_file(dir.path(), "1.txt", "feature one\n", "Feature edit");

    // an untracked file neither side knows stays put
    write_file(FileSpec::new(dir.path().join("notes.txt"), "mine\n".to_string()));

    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    assert!(!dir.path().join("feature.txt").exists());
    assert_eq!(read_file(&dir.path().join("1.txt")), "one\n");
    assert_eq!(read_file(&dir.path().join("notes.txt")), "mine\n");

    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\nfeature\n*master\n"));

    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.path().join("feature.txt")), "feature\n");
    assert_eq!(read_file(&dir.path().join("1.txt")), "feature one\n");

    Ok(())
}

#[rstest]
fn checkout_branch_clears_the_stage(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("staged.txt"), "s\n".to_string()));
    sprig_add(dir.path(), &["staged.txt"]);

    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();

    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"))
        .stdout(predicate::str::contains("=== Untracked Files ===\nstaged.txt\n\n"));

    Ok(())
}

#[rstest]
#[case::unknown("ghost", "No such branch exists.")]
#[case::current("master", "No need to checkout the current branch.")]
fn checkout_branch_preconditions(
    init_repository_dir: TempDir,
    #[case] branch: &str,
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["checkout", branch])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));

    Ok(())
}
