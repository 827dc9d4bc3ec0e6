//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Backend used when neither settings nor flags name one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Identity Toolkit REST root
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

pub const DEFAULT_TAX_RATE: f64 = 0.05;

/// Products below this stock level are flagged as low
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

pub const DEFAULT_LOW_STOCK_REFRESH_SECS: u64 = 30;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw TCP port most network receipt printers listen on
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Currencies offered at checkout
pub const CURRENCIES: [&str; 3] = ["usd", "zig", "rand"];

/// Verification polling after sign-up
pub const VERIFY_POLL_ATTEMPTS: u32 = 6;
pub const VERIFY_POLL_INTERVAL_SECS: u64 = 10;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const DATA_DIR_NAME: &str = ".posterm";
pub const SETTINGS_FILE: &str = "settings.yaml";
pub const SESSION_FILE: &str = "session.yaml";
pub const DOCUMENTS_DIR: &str = "documents";
pub const LOG_FILE: &str = "posterm.log";

/// Application name
pub const APP_NAME: &str = "posterm";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connect/write timeout for receipt printers
pub const PRINTER_TIMEOUT_SECS: u64 = 5;
