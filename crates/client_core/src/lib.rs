//! Client side of the hate-speech detector: backend access, the UI state
//! machine shared by every front end, and the view models it renders into.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod view;

pub use backend::{abandon, execute, BackendRequest, Command, DetectorBackend};
pub use config::{load_settings, Settings};
pub use controller::{
    BackendStatus, Notification, NotificationKind, Outcome, Transition, UiEvent, UiState,
};
pub use error::ClientError;
pub use http::{CallPolicy, HttpDetectorClient};
pub use view::ResultView;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
