pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "shopchat",
    about = "Shopchat operator CLI",
    long_about = "Operate Shopchat migrations, demo fixtures, config inspection, and one-shot chat queries.",
    after_help = "Examples:\n  shopchat doctor --json\n  shopchat seed\n  shopchat ask \"show me headphones under $100\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and orders, then verify the contract")]
    Seed,
    #[command(about = "Inspect effective configuration values")]
    Config,
    #[command(about = "Validate config and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run a single chat message through the interpreter and print the reply")]
    Ask {
        #[arg(help = "The chat message, quoted")]
        message: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Ask { message } => commands::ask::run(&message),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
