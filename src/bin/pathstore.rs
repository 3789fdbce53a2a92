//! Pathstore CLI Binary
//!
//! Reads store commands line by line and prints their results.

use clap::Parser;
use pathstore::tooling::cli::{Cli, CliContext, Commands};
use pathstore::tooling::Outcome;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = context.init_logging() {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let command = cli.command.clone().unwrap_or(Commands::Shell);
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match context.execute(&command, stdin, &mut stdout) {
        Ok(Outcome::OutOfMemory) => process::exit(2),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
