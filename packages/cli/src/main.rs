mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{bind, check, init, resolve, BindArgs, CheckArgs, InitArgs, ResolveArgs};

/// Pagecraft CLI - inspect and resolve page documents
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default pagecraft.config.json
    Init(InitArgs),

    /// Validate a page (unique ids, bindings) and print node counts
    Check(CheckArgs),

    /// Print the render projection of a page, or one node's styles
    Resolve(ResolveArgs),

    /// Resolve a binding spec against collections and print the records
    Bind(BindArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| ".".to_string());

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Resolve(args) => resolve(args, &cwd),
        Command::Bind(args) => bind(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
