use crate::common::command::{
    commit_file, head_commit_id, init_repository_dir, run_sprig_command, sprig_merge,
};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn merge_fast_forward(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "feature.txt", "feature\n", "Feature work");
    let feature_tip = head_commit_id(dir.path())?;
    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    sprig_merge(dir.path(), "feature")
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(head_commit_id(dir.path())?, feature_tip);
    assert_eq!(read_file(&dir.path().join("feature.txt")), "feature\n");
    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\nfeature\n*master\n"));

    Ok(())
}

#[rstest]
fn merge_ancestor_fails(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "old"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "newer\n", "Move ahead");
    let head = head_commit_id(dir.path())?;

    sprig_merge(dir.path(), "old")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Given branch is an ancestor of the current branch.",
        ));

    assert_eq!(head_commit_id(dir.path())?, head);

    Ok(())
}
