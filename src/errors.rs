//! User-facing failures
//!
//! Every precondition violation a command can hit is a [`UserError`]. Commands
//! raise them through `anyhow`, so callers that care about the exact failure
//! can `downcast_ref::<UserError>()` while the binary just prints the message.

/// Precondition failures reported back to the user verbatim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("A sprig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Not in an initialized sprig directory.")]
    NotInitialized,
    #[error("File does not exist.")]
    MissingFile,
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("No commit with that id exists.")]
    UnknownCommit,
    #[error("Commit id prefix {0} is ambiguous.")]
    AmbiguousCommit(String),
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("A branch with that name already exists.")]
    BranchExists,
    #[error("Branch name conflicts with existing branch {0}.")]
    BranchPathConflict(String),
    #[error("A branch with that name does not exist.")]
    UnknownBranch,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
    #[error("Given branch is an ancestor of the current branch.")]
    AncestorMerge,
    #[error("Incorrect operands.")]
    IncorrectOperands,
}

/// Returns the [`UserError`] carried by an `anyhow` error, if any
pub fn user_error(error: &anyhow::Error) -> Option<&UserError> {
    error.downcast_ref::<UserError>()
}
