//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, HttpDetectorClient, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::WorkerEvent;

/// Starts the backend worker. The worker stops once every command sender is dropped.
pub fn launch(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<WorkerEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || run_worker(settings, cmd_rx, ui_tx))
}

fn connect(settings: &Settings, ui_tx: &Sender<WorkerEvent>) -> Option<Arc<HttpDetectorClient>> {
    match HttpDetectorClient::from_settings(settings) {
        Ok(client) => {
            tracing::info!(backend = %client.base_url(), "backend client ready");
            let _ = ui_tx.send(WorkerEvent::Connected {
                backend_url: client.base_url().to_string(),
            });
            Some(Arc::new(client))
        }
        Err(err) => {
            tracing::error!("failed to build backend client: {err}");
            let _ = ui_tx.send(WorkerEvent::StartupFailed(err.to_string()));
            None
        }
    }
}

fn run_worker(mut settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<WorkerEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = ui_tx.send(WorkerEvent::StartupFailed(format!(
                "failed to build backend runtime: {err}"
            )));
            return;
        }
    };

    let mut client = connect(&settings, &ui_tx);

    while let Ok(cmd) = cmd_rx.recv() {
        tracing::debug!(command = cmd.name(), "backend worker received command");
        match cmd {
            BackendCommand::Connect { backend_url } => {
                settings.backend_url = backend_url;
                if let Some(next) = connect(&settings, &ui_tx) {
                    client = Some(next);
                }
            }
            BackendCommand::Execute(command) => {
                let ui_tx = ui_tx.clone();
                match client.clone() {
                    Some(client) => {
                        runtime.spawn(async move {
                            let event = execute(client.as_ref(), command).await;
                            let _ = ui_tx.send(WorkerEvent::Ui(event));
                        });
                    }
                    None => {
                        let event = client_core::abandon(
                            command,
                            client_core::ClientError::Unavailable(
                                "no backend client is configured".to_string(),
                            ),
                        );
                        let _ = ui_tx.send(WorkerEvent::Ui(event));
                    }
                }
            }
        }
    }

    tracing::debug!("backend command queue closed; worker exiting");
}
