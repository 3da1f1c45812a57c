use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::WorkerEvent;
use crate::ui::DetectorApp;

#[derive(Parser, Debug)]
#[command(name = "detector-gui", about = "Desktop front end for the hate-speech detector")]
struct Args {
    /// Backend base URL; overrides detector.toml and APP__BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file (defaults to ./detector.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }
    let backend_url = settings.backend_url.clone();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<WorkerEvent>(2048);
    let _worker = backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Hate Speech Detector")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Hate Speech Detector",
        options,
        Box::new(move |_cc| Ok(Box::new(DetectorApp::new(cmd_tx, ui_rx, backend_url)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start desktop GUI: {err}"))
}
