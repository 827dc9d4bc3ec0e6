//! # posterm
//!
//! A terminal point-of-sale client for a REST sales backend.
//!
//! ## Features
//! - Email/password sign-in, sign-up with email verification, password reset
//! - Sales catalogue with category filter, search and barcode entry
//! - Cart with currency conversion, tax, customer selection and change
//! - Receipts saved as HTML/text and sent to raw-TCP receipt printers
//! - Product, supplier and purchase-order management
//! - Low-stock monitor with auto-refresh
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod models;
pub mod storage;
pub mod identity;
pub mod cart;
pub mod checkout;
pub mod receipt;
pub mod printer;
pub mod forms;
pub mod filters;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Settings;
pub use models::{Product, Supplier, PurchaseOrder, Customer, UserProfile};
pub use cart::{Cart, Totals};
pub use receipt::Receipt;
pub use identity::{IdentityProvider, RestIdentity, Session};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, NetworkActor};
