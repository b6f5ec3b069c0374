use crate::common::command::{commit_file, head_commit_id, init_repository_dir, run_sprig_command};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn global_log_all_commits(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let mut expected = vec![head_commit_id(dir.path())?];

    run_sprig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "master edit\n", "Edit on master");
    expected.push(head_commit_id(dir.path())?);

    run_sprig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir.path(), "side.txt", "side\n", "Work on side");
    expected.push(head_commit_id(dir.path())?);

    // removing the branch does not remove its snapshots
    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_sprig_command(dir.path(), &["rm-branch", "side"])
        .assert()
        .success();

    let output = run_sprig_command(dir.path(), &["global-log"]).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let listed = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .collect::<Vec<_>>();

    // the root snapshot is listed too
    assert_eq!(listed.len(), expected.len() + 1);
    for oid in &expected {
        assert!(listed.contains(&oid.as_str()), "{oid} missing from global-log");
    }
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);

    Ok(())
}
