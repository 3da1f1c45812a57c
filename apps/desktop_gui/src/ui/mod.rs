//! UI layer for desktop GUI: app shell and result widgets.

pub mod app;
pub mod results;

pub use app::DetectorApp;
