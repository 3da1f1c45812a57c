use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    execute, load_settings, BackendStatus, DetectorBackend, HttpDetectorClient, Transition,
    UiEvent, UiState,
};
use shared::domain::ModelId;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "detector", about = "Query a hate-speech detector backend")]
struct Args {
    /// Backend base URL; overrides detector.toml and APP__BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file (defaults to ./detector.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    attempts: Option<u32>,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Check that the backend is reachable and list the models it serves.
    Health,
    /// List the models the backend has loaded.
    Models,
    /// Classify one text with one model.
    Analyze {
        #[arg(long)]
        model: ModelId,
        text: String,
    },
    /// Classify one text with every model the backend has.
    Compare { text: String },
    /// Classify each non-empty line of a file (or stdin) with one model.
    Batch {
        #[arg(long)]
        model: ModelId,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Feeds `events` through the controller, running each issued command to completion.
async fn run_session<B>(backend: &B, mut state: UiState, events: Vec<UiEvent>) -> UiState
where
    B: DetectorBackend + ?Sized,
{
    for event in events {
        let Transition {
            state: next,
            command,
        } = state.apply(event);
        state = next;
        if let Some(command) = command {
            let completion = execute(backend, command).await;
            state = state.apply(completion).state;
        }
    }
    state
}

fn read_batch_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch file '{}'", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read batch input from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.request_timeout_ms = Some(timeout_ms);
    }
    if let Some(attempts) = args.attempts {
        settings.max_attempts = attempts;
    }
    let client = HttpDetectorClient::from_settings(&settings)?;
    tracing::debug!(backend = %client.base_url(), policy = ?client.policy(), "client ready");

    let events = match &args.action {
        Action::Health => vec![UiEvent::CheckHealth],
        Action::Models => vec![UiEvent::ListModels],
        Action::Analyze { model, text } => vec![
            UiEvent::EditText(text.clone()),
            UiEvent::SelectModel(model.clone()),
            UiEvent::AnalyzeSingle,
        ],
        Action::Compare { text } => {
            vec![UiEvent::EditText(text.clone()), UiEvent::CompareModels]
        }
        Action::Batch { model, file } => vec![
            UiEvent::EditBatch(read_batch_input(file.as_ref())?),
            UiEvent::SelectModel(model.clone()),
            UiEvent::AnalyzeBatch,
        ],
    };

    let state = run_session(&client, UiState::new(), events).await;

    if let Some(notification) = state.notification() {
        return Err(anyhow!("{}", notification.message));
    }

    match args.action {
        Action::Health if args.json => println!(
            "{}",
            serde_json::to_string_pretty(&render::health_json(
                state.backend(),
                state.available_models()
            ))?
        ),
        Action::Models if args.json => println!(
            "{}",
            serde_json::to_string_pretty(&render::models_json(state.available_models()))?
        ),
        Action::Health => {
            if let BackendStatus::Online { message } = state.backend() {
                println!("{}", message.as_deref().unwrap_or("backend is up"));
            }
            print!("{}", render::model_list(state.available_models()));
        }
        Action::Models => print!("{}", render::model_list(state.available_models())),
        _ if args.json => println!("{}", serde_json::to_string_pretty(state.results())?),
        _ => print!("{}", render::result_view(state.results())),
    }

    Ok(())
}
