mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, flatten, init, CompileArgs, FlattenArgs, InitArgs};
use tracing::Level;

/// Marionette CLI - compile component trees described as data into markup
#[derive(Parser, Debug)]
#[command(name = "marionette")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log compiler internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config file and example inputs
    Init(InitArgs),

    /// Compile a data tree against a component registry
    Compile(CompileArgs),

    /// Print the flattened (or rebuilt) form of a JSON object
    Flatten(FlattenArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Compile(args) => compile(args, &cwd),
                Command::Flatten(args) => flatten(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
