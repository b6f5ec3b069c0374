use crate::common::command::{
    commit_file, head_commit_id, init_repository_dir, run_sprig_command, sprig_add, sprig_merge,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case::self_merge("master", "Cannot merge a branch with itself.")]
#[case::unknown_branch("ghost", "A branch with that name does not exist.")]
fn merge_branch_preconditions(
    init_repository_dir: TempDir,
    #[case] branch: &str,
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    sprig_merge(init_repository_dir.path(), branch)
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));

    Ok(())
}

#[rstest]
fn merge_with_staged_changes_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("pending.txt"), "p\n".to_string()));
    sprig_add(dir.path(), &["pending.txt"]);

    sprig_merge(dir.path(), "feature")
        .assert()
        .failure()
        .stderr(predicate::str::contains("You have uncommitted changes."));

    Ok(())
}

#[rstest]
fn merge_untracked_file_in_the_way(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    run_sprig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "1.txt", "master\n", "Master edit");
    run_sprig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "clash.txt", "feature\n", "Feature adds clash.txt");
    run_sprig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    let head = head_commit_id(dir.path())?;

    write_file(FileSpec::new(dir.path().join("clash.txt"), "mine\n".to_string()));

    sprig_merge(dir.path(), "feature")
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert_eq!(read_file(&dir.path().join("clash.txt")), "mine\n");
    assert_eq!(head_commit_id(dir.path())?, head);

    Ok(())
}
