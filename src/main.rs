use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use sprig::areas::repository::Repository;
use sprig::artifacts::core::{PagerWriter, pager_enabled};
use sprig::errors::UserError;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives
const LOG_ENV: &str = "SPRIG_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "sprig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small local version-control system",
    long_about = "sprig records snapshots of a working directory, keeps branches of them \
    and merges branches with a three-way merge. Everything stays local: there is no \
    remote, no network and no packing.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path, \
        with a single empty snapshot on the master branch."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes as a new snapshot",
        long_about = "This command creates a new snapshot from the current one plus everything staged, \
        moves the current branch to it and empties the stage."
    )]
    Commit {
        #[arg(index = 1, default_value = "", help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal and delete it if it is tracked"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every snapshot ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of snapshots with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "Usage:\n  \
        sprig checkout -- <file>          restore <file> from the current snapshot\n  \
        sprig checkout <id> -- <file>     restore <file> from snapshot <id> (prefixes allowed)\n  \
        sprig checkout <branch>           switch to <branch>"
    )]
    Checkout {
        #[arg(index = 1, help = "A snapshot id or a branch name")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current snapshot")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a snapshot and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => open_repository(Box::new(std::io::stdout()))?,
            };

            repository.init()?
        }
        Commands::Add { file } => open_repository(Box::new(std::io::stdout()))?.add(file)?,
        Commands::Commit { message } => {
            open_repository(Box::new(std::io::stdout()))?.commit(message)?;
        }
        Commands::Rm { file } => open_repository(Box::new(std::io::stdout()))?.rm(file)?,
        Commands::Log => run_paged(|repository| repository.log())?,
        Commands::GlobalLog => run_paged(|repository| repository.global_log())?,
        Commands::Find { message } => {
            open_repository(Box::new(std::io::stdout()))?.find(message)?
        }
        Commands::Status => open_repository(Box::new(std::io::stdout()))?.status()?,
        Commands::Checkout { target, file } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            match (target.as_deref(), file.as_deref()) {
                (None, Some(file)) => repository.checkout_file(file)?,
                (Some(commit), Some(file)) => repository.checkout_file_from(commit, file)?,
                (Some(branch), None) => repository.checkout_branch(branch)?,
                (None, None) => return Err(UserError::IncorrectOperands.into()),
            }
        }
        Commands::Branch { name } => open_repository(Box::new(std::io::stdout()))?.branch(name)?,
        Commands::RmBranch { name } => {
            open_repository(Box::new(std::io::stdout()))?.rm_branch(name)?
        }
        Commands::Reset { commit } => open_repository(Box::new(std::io::stdout()))?.reset(commit)?,
        Commands::Merge { branch } => open_repository(Box::new(std::io::stdout()))?.merge(branch)?,
    }

    Ok(())
}

/// Repository rooted at the current working directory
fn open_repository(writer: Box<dyn Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), writer)
}

/// Run a listing command, through the pager when stdout is interactive
fn run_paged(command: impl FnOnce(&mut Repository) -> Result<()>) -> Result<()> {
    if !pager_enabled() {
        return command(&mut open_repository(Box::new(std::io::stdout()))?);
    }

    let pager = Pager::new();
    let mut repository = open_repository(Box::new(PagerWriter::new(pager.clone())))?;
    command(&mut repository)?;
    minus::page_all(pager)?;

    Ok(())
}
