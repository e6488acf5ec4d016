use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, SearchArgs};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON/YAML on stdout stays parseable
    let default_filter = if cli.verbose > 0 {
        "colpofind_cli=debug,colpofind_core=debug"
    } else {
        "colpofind_cli=info,colpofind_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        // Bare invocation runs the default search
        None => search::run(&cli, &SearchArgs::default()).await,
        Some(Commands::Search(args)) => search::run(&cli, args).await,
        Some(Commands::Rank {
            files,
            profile,
            save,
        }) => rank::run(&cli, files, profile.as_deref(), save.as_deref()),
        Some(Commands::Score {
            title,
            abstract_text,
            profile,
        }) => score::run(&cli, title, abstract_text.as_deref(), profile.as_deref()),
        Some(Commands::Profiles { action }) => profiles::run(&cli, action.clone()),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
