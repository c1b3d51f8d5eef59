mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, CommentCommands};
use obsmon::commands::{comment, inspect, status, UnitSelector};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("obsmon={default_level},warn"))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Status {
            unit,
            json,
            no_cache,
        } => status::execute(config, &UnitSelector::from(unit), json, no_cache),
        Commands::Paths { unit } => inspect::paths(config, &UnitSelector::from(unit)),
        Commands::Show { unit, kind } => inspect::show(config, &UnitSelector::from(unit), kind),
        Commands::Images { unit } => inspect::images(config, &UnitSelector::from(unit)),
        Commands::Comment { command } => match command {
            CommentCommands::Add { unit, author, text } => {
                comment::add(config, &UnitSelector::from(unit), &author, &text)
            }
            CommentCommands::List { unit, json } => {
                comment::list(config, &UnitSelector::from(unit), json)
            }
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "obsmon", &mut std::io::stdout());
            Ok(())
        }
    }
}
