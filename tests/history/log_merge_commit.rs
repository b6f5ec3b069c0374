use crate::common::command::{
    commit_file, head_commit_id, init_repository_dir, logged_commit_ids, run_sprig_command,
    sprig_merge,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// History:
///       A
///      / \
///     B   C
///      \ /
///       M   (master)
///
/// `log` follows first parents only, so C is not listed.
#[rstest]
fn log_merge_commit(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let a = head_commit_id(dir.path())?;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "master.txt", "master\n", "B on master");
    let b = head_commit_id(dir.path())?;

    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "feature.txt", "feature\n", "C on feature");
    let c = head_commit_id(dir.path())?;

    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    sprig_merge(dir.path(), "feature").assert().success();

    let history = logged_commit_ids(dir.path())?;
    assert_eq!(history.len(), 4);
    assert_eq!(&history[1..3], &[b.clone(), a]);
    assert!(!history.contains(&c));

    run_sprig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Merge: {} {}\nDate: Sun Jan 1 12:00:00 2023 +0000\nMerged feature into master.\n",
            &b[..7],
            &c[..7]
        )));

    Ok(())
}
