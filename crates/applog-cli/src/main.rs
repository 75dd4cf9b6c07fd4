//! applog CLI
//!
//! Command-line driver for the applog logging facade

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "applog")]
#[command(about = "applog - Structured logging facade", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize the facade and emit one record
    Emit(commands::emit::EmitArgs),
    /// Print the level token table
    Levels(commands::levels::LevelsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Emit(args) => commands::emit::execute(args),
        Commands::Levels(args) => commands::levels::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
