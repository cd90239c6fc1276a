//! Share CLI
//!
//! Command-line interface for keeping files in sync between a local
//! tree and a shared directory.

mod cli;
mod commands;
mod error;
mod render;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use share_core::{Command, ConfigOverrides, RootConfig, RunOptions, SyncEngine};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;
use render::Printer;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} file sync utility", "share".green().bold());
        println!();
        println!("Run {} for available commands.", "share --help".cyan());
        return Ok(0);
    };

    // Completions need no roots, so they run before resolution; every
    // other command fails fast on a bad configuration.
    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "share", &mut std::io::stdout());
        return Ok(0);
    }

    let overrides = ConfigOverrides {
        local_root: cli.local_root,
        shared_root: cli.shared_root,
        ignore_file: cli.ignore_file,
    };
    let config = RootConfig::resolve(&overrides)?;
    let engine = SyncEngine::new(config)?;
    let printer = Printer::new(cli.quiet);
    let options = RunOptions {
        preview: cli.preview,
    };

    execute_command(&engine, &printer, &options, command)
}

fn execute_command(
    engine: &SyncEngine,
    printer: &Printer,
    options: &RunOptions,
    command: Commands,
) -> Result<i32> {
    match command {
        Commands::Put { paths } => cmd_paths(engine, printer, options, Command::Put, paths),
        Commands::Push { paths } => cmd_paths(engine, printer, options, Command::Push, paths),
        Commands::Get { paths } => cmd_paths(engine, printer, options, Command::Get, paths),
        Commands::Pull { paths } => cmd_paths(engine, printer, options, Command::Pull, paths),
        Commands::Sync { paths } => cmd_paths(engine, printer, options, Command::Sync, paths),
        Commands::Preview { paths } => {
            let preview = RunOptions { preview: true };
            cmd_paths(engine, printer, &preview, Command::Sync, paths)
        }
        Commands::Rm { paths } => cmd_paths(engine, printer, options, Command::Rm, paths),
        Commands::Check { paths, json } => {
            let cwd = std::env::current_dir()?;
            commands::run_check(engine, &cwd, printer, &paths, json)
        }
        Commands::Status { paths, json } => {
            let cwd = std::env::current_dir()?;
            commands::run_status(engine, &cwd, printer, &paths, json)
        }
        Commands::Audit { paths, json } => {
            let cwd = std::env::current_dir()?;
            commands::run_audit(engine, &cwd, printer, &paths, json)
        }
        Commands::List { json } => commands::run_list(engine, printer, json),
        Commands::Pushall => commands::run_tracked(engine, printer, Command::Push, options),
        Commands::Pullall => commands::run_tracked(engine, printer, Command::Pull, options),
        Commands::Syncall => commands::run_tracked(engine, printer, Command::Sync, options),
        Commands::Auditall { json } => {
            let cwd = std::env::current_dir()?;
            commands::run_audit(engine, &cwd, printer, &[], json)
        }
        Commands::Auto => {
            let cwd = std::env::current_dir()?;
            commands::run_auto(engine, &cwd, printer, options)
        }
        // Handled in run() before the roots are resolved.
        Commands::Completions { .. } => Ok(0),
    }
}

fn cmd_paths(
    engine: &SyncEngine,
    printer: &Printer,
    options: &RunOptions,
    command: Command,
    paths: Vec<PathBuf>,
) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    commands::run_paths(engine, &cwd, printer, command, &paths, options)
}
