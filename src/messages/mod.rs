//! Messages passed between the terminal, the POS state machine and the network actor
//!
//! Keys become [`UiEvent`]s, backend work travels as [`Request`]/[`Reply`] pairs
//! keyed by request id, and each state change is published as a [`RenderState`].

pub mod ui_events;
pub mod network;
pub mod render;

pub use ui_events::UiEvent;
pub use network::{NetworkCommand, NetworkResponse, Reply, Request};
pub use render::RenderState;
