//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{abandon, ClientError, Command, UiEvent};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

const QUEUE_FULL: &str = "UI command queue is full; please retry";
const WORKER_GONE: &str = "backend worker stopped; restart the app";

/// Queues `command` for the worker. When the queue refuses it, returns the
/// failed completion so the caller can settle the request right away.
pub fn dispatch_command(
    cmd_tx: &Sender<BackendCommand>,
    command: Command,
    status: &mut String,
) -> Option<UiEvent> {
    let name = command.request.name();
    let (command, reason) = match cmd_tx.try_send(BackendCommand::Execute(command)) {
        Ok(()) => {
            tracing::debug!(command = name, "queued ui->backend command");
            return None;
        }
        Err(TrySendError::Full(cmd)) => (cmd, QUEUE_FULL),
        Err(TrySendError::Disconnected(cmd)) => (cmd, WORKER_GONE),
    };
    *status = reason.to_string();
    match command {
        BackendCommand::Execute(command) => {
            Some(abandon(command, ClientError::Unavailable(reason.to_string())))
        }
        BackendCommand::Connect { .. } => None,
    }
}

pub fn dispatch_connect(cmd_tx: &Sender<BackendCommand>, backend_url: String, status: &mut String) {
    match cmd_tx.try_send(BackendCommand::Connect { backend_url }) {
        Ok(()) => *status = "Connecting...".to_string(),
        Err(TrySendError::Full(_)) => *status = QUEUE_FULL.to_string(),
        Err(TrySendError::Disconnected(_)) => *status = WORKER_GONE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use client_core::{Outcome, Transition, UiState};
    use crossbeam_channel::bounded;

    use super::*;

    fn health_command() -> (UiState, Command) {
        let Transition { state, command } = UiState::new().apply(UiEvent::CheckHealth);
        (state, command.expect("health command"))
    }

    #[test]
    fn queued_command_reaches_worker() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_, command) = health_command();
        let mut status = String::new();

        assert!(dispatch_command(&cmd_tx, command.clone(), &mut status).is_none());
        assert!(status.is_empty());
        match cmd_rx.try_recv() {
            Ok(BackendCommand::Execute(queued)) => assert_eq!(queued, command),
            other => panic!("unexpected queue state: {other:?}"),
        }
    }

    #[test]
    fn full_queue_settles_request_locally() {
        let (cmd_tx, _cmd_rx) = bounded(0);
        let (state, command) = health_command();
        let mut status = String::new();

        let event = dispatch_command(&cmd_tx, command, &mut status).expect("abandoned");
        assert!(matches!(
            &event,
            UiEvent::Completed {
                outcome: Outcome::Health(Err(ClientError::Unavailable(_))),
                ..
            }
        ));
        assert_eq!(status, QUEUE_FULL);

        let state = state.apply(event).state;
        assert!(!state.is_loading());
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (cmd_tx, cmd_rx) = bounded(4);
        drop(cmd_rx);
        let mut status = String::new();
        dispatch_connect(&cmd_tx, "http://127.0.0.1:9".to_string(), &mut status);
        assert_eq!(status, WORKER_GONE);
    }
}
