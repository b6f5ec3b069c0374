use crate::common::command::{init_repository_dir, run_sprig_command};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn rm_untracked_file_fails(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let loose = dir.path().join("loose.txt");
    write_file(FileSpec::new(loose.clone(), "loose\n".to_string()));

    run_sprig_command(dir.path(), &["rm", "loose.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reason to remove the file."));

    assert_eq!(read_file(&loose), "loose\n");
    run_sprig_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Staged Files ===\n\n=== Removed Files ===\n\n",
        ))
        .stdout(predicate::str::contains("=== Untracked Files ===\nloose.txt\n\n"));

    Ok(())
}
