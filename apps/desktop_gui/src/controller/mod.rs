//! Controller layer: worker events and command orchestration around the shared state machine.

pub mod events;
pub mod orchestration;
