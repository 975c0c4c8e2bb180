//! Tales CLI - Command-line interface for the story journal
//!
//! Lists, reads and edits stories in the hosted note table, and can follow
//! live changes from the terminal.

mod cli;
mod commands;
mod config;
mod error;
mod view;


use std::io;

use clap::Parser;
use tales_core::realtime::RealtimeFeed;
use tales_core::NoteDraft;
use tokio::io::BufReader;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{build_controller, open_rest_store};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditFields};
use crate::commands::list::run_list;
use crate::commands::render::run_render;
use crate::commands::show::run_show;
use crate::commands::watch::run_watch;
use crate::config::{resolve_store_config, CliConfigFile};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "tales=info"
            .parse()
            .map_err(|error| CliError::Config(format!("Invalid log directive: {error}")))?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let file = CliConfigFile::load(cli.config.as_deref())?;
    let store_config = resolve_store_config(&cli.connection, |key| std::env::var(key).ok(), &file)?;
    let controller_config = file.controller_config();
    let store = open_rest_store(&store_config)?;

    let live = matches!(cli.command, Commands::Watch { .. });
    let controller = build_controller(store, io::stdout(), live, true, controller_config);

    match cli.command {
        Commands::List { search, json } => run_list(&controller, search.as_deref(), json).await?,
        Commands::Show { id } => run_show(&controller, &id).await?,
        Commands::Add {
            title,
            body,
            author,
        } => run_add(&controller, NoteDraft::new(title, body, author)).await?,
        Commands::Edit {
            id,
            title,
            body,
            author,
        } => {
            let fields = EditFields {
                title,
                body,
                author,
            };
            run_edit(&controller, &id, fields).await?;
        }
        Commands::Delete { id, yes } => {
            let confirm_input = (!yes).then(|| io::BufReader::new(io::stdin()));
            run_delete(&controller, &id, confirm_input).await?;
        }
        Commands::Render { search, output } => {
            run_render(&controller, search.as_deref(), output.as_deref()).await?;
        }
        Commands::Watch { no_realtime } => {
            let changes = if no_realtime {
                None
            } else {
                Some(RealtimeFeed::new(&store_config)?.subscribe())
            };
            run_watch(&controller, changes, BufReader::new(tokio::io::stdin())).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
