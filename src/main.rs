use clap::Parser;

mod agents;
mod cli;
mod config;
mod credential;
mod discovery;
mod engine;
mod error;
mod executor;
mod llm;
mod output;
mod runner;
mod state;
#[cfg(test)]
mod testing;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `.env` can supply clap's `env` defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, cli.verbose).await,
        Commands::State(args) => {
            engine::init_console_logging(cli.verbose);
            cli::state::execute(args)
        }
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
