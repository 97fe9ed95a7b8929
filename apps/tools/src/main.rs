use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rattle::App;
use serde_json::{Map, Value};
use shared::protocol::encode_mutations;

/// Offline checks for rattle templates.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long)]
    template: PathBuf,
    #[arg(long, default_value = "rattle")]
    title: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the template with every placeholder bound.
    Render,
    /// Apply one event's props and print the resulting mutations.
    Dispatch {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "input")]
        event: String,
        #[arg(long, default_value = "{}")]
        props: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
    let cli = Cli::parse();
    println!("{}", run(cli)?);
    Ok(())
}

fn run(cli: Cli) -> Result<String> {
    let source = fs::read_to_string(&cli.template)
        .with_context(|| format!("failed to read template '{}'", cli.template.display()))?;
    let mut app = App::new(cli.title, source).context("template is not a valid app")?;
    tracing::debug!(widgets = app.widgets().len(), "template parsed");

    match cli.command {
        Command::Render => Ok(app.handle_page_load()),
        Command::Dispatch { id, event, props } => {
            let props: Map<String, Value> =
                serde_json::from_str(&props).context("--props must be a JSON object")?;
            let mutations = app.handle_event(&id, &event, props)?;
            Ok(encode_mutations(&mutations))
        }
    }
}
