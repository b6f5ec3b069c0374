use crate::common::command::{
    commit_file, head_commit_id, init_repository_dir, logged_commit_ids, run_sprig_command,
    sprig_add,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn reset_to_ancestor(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let target_history = logged_commit_ids(dir.path())?;
    let target = head_commit_id(dir.path())?;

    commit_file(dir.path(), "1.txt", "one v2\n", "Edit 1.txt");
    commit_file(dir.path(), "3.txt", "three\n", "Add 3.txt");
    write_file(FileSpec::new(dir.path().join("staged.txt"), "s\n".to_string()));
    sprig_add(dir.path(), &["staged.txt"]);

    run_sprig_command(dir.path(), &["reset", &target[..8]])
        .assert()
        .success();

    assert_eq!(logged_commit_ids(dir.path())?, target_history);
    assert_eq!(read_file(&dir.path().join("1.txt")), "one\n");
    assert!(!dir.path().join("3.txt").exists());

    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"))
        .stdout(predicate::str::contains("=== Untracked Files ===\nstaged.txt\n\n"));

    Ok(())
}

#[rstest]
fn reset_to_unknown_commit_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["reset", "0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No commit with that id exists."));

    Ok(())
}
