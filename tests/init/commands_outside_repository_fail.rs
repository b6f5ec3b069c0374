use crate::common::command::{repository_dir, run_sprig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case::log(&["log"])]
#[case::status(&["status"])]
#[case::add(&["add", "file.txt"])]
#[case::commit(&["commit", "message"])]
#[case::branch(&["branch", "feature"])]
#[case::merge(&["merge", "feature"])]
fn commands_outside_repository_fail(
    repository_dir: TempDir,
    #[case] args: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not in an initialized sprig directory.",
        ));

    assert!(!repository_dir.path().join(".sprig").exists());

    Ok(())
}
