use crate::common::command::{head_commit_id, init_repository_dir, run_sprig_command};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_branch(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let head = head_commit_id(dir.path())?;

    run_sprig_command(dir.path(), &["branch", "feature/login"])
        .assert()
        .success();

    let branch_ref = dir
        .path()
        .join(".sprig")
        .join("refs")
        .join("heads")
        .join("feature")
        .join("login");
    assert_eq!(read_file(&branch_ref).trim(), head);

    // the current branch does not change
    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "=== Branches ===\nfeature/login\n*master\n",
        ));

    Ok(())
}

#[rstest]
fn create_existing_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["branch", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name already exists.",
        ));

    Ok(())
}

#[rstest]
#[case::double_dot("bad..name")]
#[case::trailing_slash("bad/")]
#[case::lock_suffix("bad.lock")]
fn create_branch_with_invalid_name_fails(
    init_repository_dir: TempDir,
    #[case] name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));

    Ok(())
}

#[rstest]
#[case::parent_of_existing("feature/login", "feature")]
#[case::child_of_existing("feature", "feature/login")]
fn create_nested_branch_fails(
    init_repository_dir: TempDir,
    #[case] existing: &str,
    #[case] requested: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", existing])
        .assert()
        .success();
    run_sprig_command(dir.path(), &["branch", requested])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "Branch name conflicts with existing branch {existing}."
        )));

    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "=== Branches ===\n{existing}\n*master\n"
        )));

    Ok(())
}
