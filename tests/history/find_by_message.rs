use crate::common::command::{commit_file, head_commit_id, init_repository_dir, run_sprig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn find_by_message(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;

    commit_file(dir.path(), "1.txt", "v2\n", "Bump");
    let first = head_commit_id(dir.path())?;
    commit_file(dir.path(), "1.txt", "v3\n", "Bump version");
    commit_file(dir.path(), "1.txt", "v4\n", "Bump");
    let second = head_commit_id(dir.path())?;

    let mut expected = vec![first, second];
    expected.sort();

    run_sprig_command(dir.path(), &["find", "Bump"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected.join("\n")));

    Ok(())
}

#[rstest]
fn find_unknown_message_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["find", "Never written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Found no commit with that message."));

    Ok(())
}
