//! localstore CLI
//!
//! Terminal front end for the local store session: an interactive items
//! page plus one-shot commands over the same persisted snapshot.

use clap::{Parser, Subcommand};

mod commands;
mod context;
mod counter;

#[derive(Debug, Parser)]
#[command(name = "localstore")]
#[command(about = "localstore - embedded SQLite items list with snapshot persistence", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: context::GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive items page (default)
    Shell,
    /// Print the stored items
    List,
    /// Add items
    Add(commands::items::AddArgs),
    /// Run read-only SQL and print the result sets as JSON
    Query(commands::query::QueryArgs),
    /// Re-persist the current store
    Save,
    /// Delete the stored snapshot
    Reset,
    /// Click counter: every input line is a click
    Counter,
}

fn main() {
    let cli = Cli::parse();

    let result = context::AppContext::from_args(&cli.global).and_then(|ctx| {
        match cli.command.unwrap_or(Commands::Shell) {
            Commands::Shell => commands::shell::execute(&ctx),
            Commands::List => commands::items::execute_list(&ctx),
            Commands::Add(args) => commands::items::execute_add(&ctx, args),
            Commands::Query(args) => commands::query::execute(&ctx, args),
            Commands::Save => commands::items::execute_save(&ctx),
            Commands::Reset => commands::items::execute_reset(&ctx),
            Commands::Counter => commands::counter::execute(),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
