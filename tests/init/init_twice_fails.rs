use crate::common::command::{repository_dir, run_sprig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_twice_fails(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_sprig_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A sprig version-control system already exists in the current directory.",
        ));

    Ok(())
}
