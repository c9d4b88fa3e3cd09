mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{build, fetch, init, watch, BuildArgs, FetchArgs, InitArgs, WatchArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Prerender - static HTML fragments for lazily loaded components
#[derive(Parser, Debug)]
#[command(name = "prerender")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    root: Option<PathBuf>,

    /// Log pipeline internals (same as RUST_LOG=prerender=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default prerender.config.json and an example component
    Init(InitArgs),

    /// Prerender every component once
    Build(BuildArgs),

    /// Build, then re-render components as they change
    Watch(WatchArgs),

    /// Load one component through the client loader and print it
    Fetch(FetchArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "prerender=debug" } else { "prerender=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Command::Init(args) => init(args, &root),
        Command::Build(args) => build(args, &root),
        Command::Watch(args) => watch(args, &root),
        Command::Fetch(args) => fetch(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
