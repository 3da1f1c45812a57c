//! Worker thread that owns the HTTP client and runs backend commands.

pub mod commands;
pub mod runtime;
