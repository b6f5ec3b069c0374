use crate::common::command::{
    head_commit_id, repository_dir, run_sprig_command, sprig_add, sprig_commit_with_timestamp,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn log_linear_history(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_sprig_command(dir.path(), &["init"]).assert().success();
    let root = head_commit_id(dir.path())?;

    write_file(FileSpec::new(dir.path().join("a.txt"), "1\n".to_string()));
    sprig_add(dir.path(), &["a.txt"]);
    sprig_commit_with_timestamp(dir.path(), "First", "2023-01-01 10:00:00 +0000")
        .assert()
        .success();
    let first = head_commit_id(dir.path())?;

    write_file(FileSpec::new(dir.path().join("a.txt"), "2\n".to_string()));
    sprig_add(dir.path(), &["a.txt"]);
    sprig_commit_with_timestamp(dir.path(), "Second", "2023-01-01 11:30:00 +0200")
        .assert()
        .success();
    let second = head_commit_id(dir.path())?;

    let output = run_sprig_command(dir.path(), &["log"]).output()?;
    assert!(output.status.success());

    assert_eq!(
        String::from_utf8(output.stdout)?,
        format!(
            "===\ncommit {second}\nDate: Sun Jan 1 11:30:00 2023 +0200\nSecond\n\n\
             ===\ncommit {first}\nDate: Sun Jan 1 10:00:00 2023 +0000\nFirst\n\n\
             ===\ncommit {root}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"
        )
    );

    Ok(())
}
