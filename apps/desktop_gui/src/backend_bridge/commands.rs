//! Backend commands queued from UI to backend worker.

use client_core::Command;

#[derive(Debug)]
pub enum BackendCommand {
    /// Run one controller command and post its completion back.
    Execute(Command),
    /// Rebuild the client against another backend base URL.
    Connect { backend_url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute(command) => command.request.name(),
            Self::Connect { .. } => "connect",
        }
    }
}
