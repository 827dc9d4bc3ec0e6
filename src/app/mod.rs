//! App layer - owns the per-screen POS state
//!
//! Key events become cart, form and list changes; backend replies fill
//! the catalogue and screen lists. Every change yields queued requests for
//! the network actor and a fresh render snapshot.

pub mod actor;
mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::{AppState, Notice, PendingAction};
