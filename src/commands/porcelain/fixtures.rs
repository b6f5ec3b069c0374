use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::UserError;
use assert_fs::TempDir;
use rstest::fixture;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Writer whose output stays readable after it is boxed into a repository
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn take(&self) -> String {
        String::from_utf8(std::mem::take(&mut *self.0.borrow_mut())).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// An initialized in-memory repository plus its captured output
pub struct TestRepository {
    pub repository: Repository,
    pub output: SharedBuffer,
}

impl TestRepository {
    pub fn write(&self, name: &str, content: &str) {
        self.repository
            .workspace()
            .write_file(name, content.as_bytes())
            .expect("write working file");
    }

    pub fn read(&self, name: &str) -> String {
        let content = self
            .repository
            .workspace()
            .read_file(name)
            .expect("read working file");
        String::from_utf8(content.to_vec()).expect("utf-8 working file")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.repository.workspace().exists(name)
    }

    pub fn delete(&self, name: &str) {
        self.repository
            .workspace()
            .remove_file(name)
            .expect("delete working file");
    }

    /// Write, stage and commit every `(name, content)` pair
    pub fn commit_files(&mut self, message: &str, files: &[(&str, &str)]) -> ObjectId {
        for (name, content) in files {
            self.write(name, content);
            self.repository.add(name).expect("add");
        }

        let oid = self.repository.commit(message).expect("commit");
        self.output.take();
        oid
    }

    pub fn head(&self) -> ObjectId {
        self.repository.refs().expect("refs").head().clone()
    }

    pub fn snapshot_count(&self) -> usize {
        self.repository
            .database()
            .snapshot_ids()
            .expect("snapshot ids")
            .len()
    }
}

/// The [`UserError`] a failed command raised
pub fn expect_user_error<T: std::fmt::Debug>(result: anyhow::Result<T>) -> UserError {
    let error = result.expect_err("command should fail");
    error
        .downcast_ref::<UserError>()
        .cloned()
        .unwrap_or_else(|| panic!("expected a user error, got: {error:?}"))
}

#[fixture]
pub fn repo() -> TestRepository {
    colored::control::set_override(false);

    let output = SharedBuffer::default();
    let mut repository = Repository::in_memory(Box::new(output.clone()));
    repository.init().expect("init");
    output.take();

    TestRepository { repository, output }
}

/// An initialized repository on disk, kept alive by the returned directory
#[fixture]
pub fn fs_repo() -> (TempDir, TestRepository) {
    colored::control::set_override(false);

    let dir = TempDir::new().expect("temp dir");
    let output = SharedBuffer::default();
    let mut repository = Repository::new(&dir.path().to_string_lossy(), Box::new(output.clone()))
        .expect("open repository");
    repository.init().expect("init");
    output.take();

    (dir, TestRepository { repository, output })
}
