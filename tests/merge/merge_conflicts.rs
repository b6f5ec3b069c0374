use crate::common::command::{
    commit_file, init_repository_dir, logged_commit_ids, run_sprig_command, sprig_commit,
    sprig_merge,
};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn merge_conflicting_edits(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "master\n", "Master edit");
    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "feature\n", "Feature edit");
    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    let history_before = logged_commit_ids(dir.path())?;

    sprig_merge(dir.path(), "feature")
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.path().join("1.txt")),
        "<<<<<<< HEAD\nmaster\n=======\nfeature\n>>>>>>>\n"
    );

    // the conflict is committed in a merge snapshot
    let history = logged_commit_ids(dir.path())?;
    assert_eq!(history.len(), history_before.len() + 1);
    run_sprig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged feature into master."))
        .stdout(predicate::str::contains("Merge: "));

    Ok(())
}

#[rstest]
fn merge_deletion_against_modification(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_sprig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();
    sprig_commit(dir.path(), "Master deletes 1.txt")
        .assert()
        .success();

    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "z\n", "Feature edits 1.txt");
    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    sprig_merge(dir.path(), "feature")
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.path().join("1.txt")),
        "<<<<<<< HEAD\n=======\nz\n>>>>>>>\n"
    );

    Ok(())
}
