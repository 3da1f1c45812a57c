//! Events posted from the backend worker to the UI thread.

use client_core::{BackendStatus, UiEvent};

#[derive(Debug)]
pub enum WorkerEvent {
    /// The worker built a client for `backend_url`.
    Connected { backend_url: String },
    /// The worker could not build its runtime or client.
    StartupFailed(String),
    /// A completion (or other event) for the state machine.
    Ui(UiEvent),
}

pub fn backend_status_line(status: &BackendStatus) -> String {
    match status {
        BackendStatus::Unknown => "Checking backend...".to_string(),
        BackendStatus::Online { message: Some(message) } => format!("Online: {message}"),
        BackendStatus::Online { message: None } => "Online".to_string(),
        BackendStatus::Unreachable => "Backend unreachable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_prefers_backend_message() {
        assert_eq!(
            backend_status_line(&BackendStatus::Online {
                message: Some("Hate Speech Detector API is running".to_string())
            }),
            "Online: Hate Speech Detector API is running"
        );
        assert_eq!(
            backend_status_line(&BackendStatus::Unreachable),
            "Backend unreachable"
        );
    }
}
