//! twig CLI - local version control command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use twig::ops::{self, AddOutcome, MergeOutcome, RmOutcome};
use twig::Repo;

#[derive(Parser)]
#[command(name = "twig")]
#[command(about = "small local version control - snapshots, branches and three-way merge")]
#[command(version)]
struct Cli {
    /// work tree root
    #[arg(short = 'C', long, default_value = ".", env = "TWIG_ROOT")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// create a repository with an initial commit
    Init,

    /// stage a file for the next commit
    Add {
        /// path relative to the work tree root
        path: String,
    },

    /// record the staging area as a new commit
    Commit {
        /// commit message
        message: String,
    },

    /// unstage a file, or stage a tracked file for removal
    Rm {
        /// path relative to the work tree root
        path: String,
    },

    /// show first-parent history of the current branch
    Log {
        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// show every commit ever made
    GlobalLog,

    /// print ids of commits with the given message
    Find {
        /// exact commit message
        message: String,
    },

    /// show branches, staged, removed, modified and untracked files
    Status,

    /// switch branches, or restore a file
    ///
    /// `checkout <branch>`, `checkout -- <file>`, `checkout <commit> -- <file>`
    Checkout {
        /// branch name, or commit id when a file is given
        #[arg(required_unless_present = "file")]
        target: Option<String>,

        /// file to restore
        #[arg(last = true)]
        file: Option<String>,
    },

    /// create a branch at HEAD
    Branch {
        /// branch name
        name: String,
    },

    /// delete a branch pointer
    RmBranch {
        /// branch name
        name: String,
    },

    /// move the current branch to a commit and check it out
    Reset {
        /// commit id or unique prefix
        commit: String,
    },

    /// merge a branch into the current branch
    Merge {
        /// branch to merge
        branch: String,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TWIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> twig::Result<()> {
    match cli.command {
        Commands::Init => {
            ops::init(&cli.root)?;
            println!("initialized twig repository at {}", cli.root.display());
            Ok(())
        }
        command => run_in_repo(&Repo::open(&cli.root)?, command),
    }
}

fn run_in_repo(repo: &Repo, command: Commands) -> twig::Result<()> {
    match command {
        Commands::Init => {}

        Commands::Add { path } => {
            if repo.transaction(|s| ops::add(repo, s, &path))? == AddOutcome::Unchanged {
                tracing::debug!(%path, "matches HEAD, nothing staged");
            }
        }

        Commands::Commit { message } => {
            let outcome = repo.transaction(|s| ops::commit(repo, s, &message))?;
            println!("{}", outcome.hash.short());
        }

        Commands::Rm { path } => {
            if repo.transaction(|s| ops::rm(repo, s, &path))? == RmOutcome::Unstaged {
                tracing::debug!(%path, "unstaged");
            }
        }

        Commands::Log { max_count } => {
            for entry in ops::log(repo, &repo.state()?, max_count)? {
                print!("{}", entry);
            }
        }

        Commands::GlobalLog => {
            for entry in ops::global_log(repo)? {
                print!("{}", entry);
            }
        }

        Commands::Find { message } => {
            for hash in ops::find(repo, &message)? {
                println!("{}", hash);
            }
        }

        Commands::Status => {
            print!("{}", ops::status(repo, &repo.state()?)?);
        }

        Commands::Checkout { target, file } => match (target, file) {
            (Some(commit), Some(file)) => ops::checkout_file_at(repo, &commit, &file)?,
            (None, Some(file)) => ops::checkout_file(repo, &repo.state()?, &file)?,
            // clap requires a target when no file is given
            (target, None) => {
                let branch = target.unwrap_or_default();
                repo.transaction(|s| ops::checkout_branch(repo, s, &branch))?;
            }
        },

        Commands::Branch { name } => {
            repo.transaction(|s| ops::branch(s, &name))?;
        }

        Commands::RmBranch { name } => {
            repo.transaction(|s| ops::rm_branch(s, &name))?;
        }

        Commands::Reset { commit } => {
            repo.transaction(|s| ops::reset(repo, s, &commit))?;
        }

        Commands::Merge { branch } => {
            let outcome = repo.transaction(|s| ops::merge(repo, s, &branch))?;
            if !matches!(outcome, MergeOutcome::Merged { conflicted: false, .. }) {
                println!("{}", outcome);
            }
        }
    }

    Ok(())
}
