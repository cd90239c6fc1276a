//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Share - sync files between your local tree and a shared directory
#[derive(Parser, Debug)]
#[command(name = "share")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Show what would happen without touching any file
    #[arg(short = 'n', long, global = true)]
    pub preview: bool,

    /// Suppress informational output (twice to also drop per-file errors)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Local root to sync from (overrides ~/.sharepath)
    #[arg(long, global = true, env = "SHARE_PATH", value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    /// Shared directory to sync into (overrides ~/.shareroot)
    #[arg(long, global = true, env = "SHARE_ROOT", value_name = "DIR")]
    pub shared_root: Option<PathBuf>,

    /// Ignore pattern file (overrides ~/.shareignore)
    #[arg(long, global = true, env = "SHARE_IGNORE", value_name = "FILE")]
    pub ignore_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy file(s) to shared, overwriting whatever is there
    ///
    /// Examples:
    ///   share put notes.md           # Share one file
    ///   share put docs/              # Share a whole directory
    ///   share put a.txt b.txt c.txt  # Share several files at once
    Put {
        /// Files or directories to share
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy file(s) to shared only where local is newer
    Push {
        /// Files or directories to push
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy file(s) from shared to local, overwriting the local copy
    Get {
        /// Files or directories to retrieve
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy file(s) from shared only where shared is newer
    Pull {
        /// Files or directories to pull
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy whichever side is newer over the other
    Sync {
        /// Files or directories to sync
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show what sync would do, without doing it
    Preview {
        /// Files or directories to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Report how file(s) relate to their shared copies
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove file(s) from the shared directory
    #[command(alias = "remove")]
    Rm {
        /// Files or directories to remove from shared
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Summarize the whole tracked tree by sync state
    Status {
        /// Restrict to these paths (whole tracked tree when omitted)
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report only the paths that have drifted out of sync
    Audit {
        /// Restrict to these paths (whole tracked tree when omitted)
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List every tracked file
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Push the whole tracked tree
    Pushall,

    /// Pull the whole tracked tree
    Pullall,

    /// Sync the whole tracked tree
    Syncall,

    /// Audit the whole tracked tree
    Auditall {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Sync the directory you are standing in
    ///
    /// Works from either side: run it under the local root or under the
    /// shared directory and the matching subtree is synced.
    Auto,

    /// Generate shell completions
    ///
    /// Examples:
    ///   share completions bash > ~/.local/share/bash-completion/completions/share
    ///   share completions zsh > ~/.zfunc/_share
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
