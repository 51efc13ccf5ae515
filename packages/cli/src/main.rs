mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, edit, init, preview, CheckArgs, EditArgs, InitArgs, PreviewArgs};
use tracing_subscriber::EnvFilter;

/// Autoletter CLI - compose, replay and preview outreach messages
#[derive(Parser, Debug)]
#[command(name = "autoletter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default autoletter.config.json
    Init(InitArgs),

    /// Render the recipient view of a saved body
    Preview(PreviewArgs),

    /// Replay a script of editing steps against a saved body
    Edit(EditArgs),

    /// Validate markup and merge-variable tokens
    Check(CheckArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| {
            let cwd = dir.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Preview(args) => preview(args, &cwd),
                Command::Edit(args) => edit(args, &cwd),
                Command::Check(args) => check(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
