//! Client settings
//!
//! Loaded from `settings.yaml` in the data directory, then overridden by
//! environment variables and finally by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_IDENTITY_URL, DEFAULT_LOW_STOCK_REFRESH_SECS,
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PRINTER_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TAX_RATE, SETTINGS_FILE,
};

pub const ENV_BASE_URL: &str = "POSTERM_BASE_URL";
pub const ENV_IDENTITY_API_KEY: &str = "POSTERM_IDENTITY_API_KEY";

/// Receipt header
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: String::from("Your Store Name"),
            address: String::from("123 Store Address, City"),
            phone: String::from("(123) 456-7890"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PrinterKind {
    #[default]
    None,
    Network,
}

impl PrinterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterKind::None => "None",
            PrinterKind::Network => "Network",
        }
    }

    pub fn next(&self) -> PrinterKind {
        match self {
            PrinterKind::None => PrinterKind::Network,
            PrinterKind::Network => PrinterKind::None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    #[serde(rename = "58mm")]
    Mm58,
    #[default]
    #[serde(rename = "80mm")]
    Mm80,
}

impl PaperSize {
    /// Printable columns for a thermal roll of this size
    pub fn columns(&self) -> usize {
        match self {
            PaperSize::Mm58 => 32,
            PaperSize::Mm80 => 48,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::Mm58 => "58mm",
            PaperSize::Mm80 => "80mm",
        }
    }

    pub fn next(&self) -> PaperSize {
        match self {
            PaperSize::Mm58 => PaperSize::Mm80,
            PaperSize::Mm80 => PaperSize::Mm58,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    #[serde(default)]
    pub kind: PrinterKind,
    #[serde(default)]
    pub paper: PaperSize,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default = "default_printer_port")]
    pub port: u16,
}

fn default_printer_port() -> u16 {
    DEFAULT_PRINTER_PORT
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            kind: PrinterKind::None,
            paper: PaperSize::Mm80,
            ip_address: String::new(),
            port: DEFAULT_PRINTER_PORT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub identity_base_url: String,
    pub identity_api_key: String,
    pub tax_rate: f64,
    pub low_stock_threshold: i64,
    pub low_stock_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub store: StoreInfo,
    pub printer: PrinterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: String::from(DEFAULT_BASE_URL),
            identity_base_url: String::from(DEFAULT_IDENTITY_URL),
            identity_api_key: String::new(),
            tax_rate: DEFAULT_TAX_RATE,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            low_stock_refresh_secs: DEFAULT_LOW_STOCK_REFRESH_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            store: StoreInfo::default(),
            printer: PrinterSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `dir`, falling back to defaults when no file exists
    pub fn load(dir: &Path) -> Result<Settings> {
        let path = dir.join(SETTINGS_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let path = dir.join(SETTINGS_FILE);
        let content = serde_yaml::to_string(self)?;
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Replace the printer section of the settings file, leaving every other
    /// stored value as it was. Environment and flag overrides never reach disk.
    pub fn save_printer(dir: &Path, printer: &PrinterSettings) -> Result<()> {
        let mut stored = Settings::load(dir)?;
        stored.printer = printer.clone();
        stored.save(dir)
    }

    /// Apply `POSTERM_*` overrides from the given lookup (usually `std::env::var`)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_IDENTITY_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.identity_api_key = key;
        }
    }

    /// Backend URL without a trailing slash
    pub fn backend_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Label used on receipts, e.g. `Tax (5%)`
    pub fn tax_label(&self) -> String {
        format!("Tax ({}%)", format_percent(self.tax_rate))
    }
}

fn format_percent(rate: f64) -> String {
    let pct = rate * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}", pct.round() as i64)
    } else {
        format!("{:.2}", pct).trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tax_rate, 0.05);
        assert_eq!(settings.printer.port, 9100);
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.base_url = "http://10.0.0.5:8000/".into();
        settings.printer.kind = PrinterKind::Network;
        settings.printer.paper = PaperSize::Mm58;
        settings.save(dir.path()).unwrap();

        let loaded = Settings::load(dir.path()).unwrap();
        assert_eq!(loaded.backend_url(), "http://10.0.0.5:8000");
        assert_eq!(loaded.printer.kind, PrinterKind::Network);
        assert_eq!(loaded.printer.paper.columns(), 32);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "tax_rate: 0.15\n").unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.tax_rate, 0.15);
        assert_eq!(settings.low_stock_threshold, 10);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "tax_rate: [oops").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn env_overrides_skip_blank_values() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            ENV_BASE_URL => Some("http://pos.local".into()),
            ENV_IDENTITY_API_KEY => Some("   ".into()),
            _ => None,
        });
        assert_eq!(settings.base_url, "http://pos.local");
        assert!(settings.identity_api_key.is_empty());
    }

    #[test]
    fn printer_save_keeps_overrides_off_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "base_url: http://shop.local:8000\n").unwrap();

        let mut effective = Settings::load(dir.path()).unwrap();
        effective.apply_env(|key| match key {
            ENV_IDENTITY_API_KEY => Some("secret-key".into()),
            _ => None,
        });
        effective.base_url = "http://one-off:9000".into();
        effective.printer.kind = PrinterKind::Network;
        effective.printer.ip_address = "192.168.1.50".into();

        Settings::save_printer(dir.path(), &effective.printer).unwrap();

        let stored = Settings::load(dir.path()).unwrap();
        assert_eq!(stored.base_url, "http://shop.local:8000");
        assert!(stored.identity_api_key.is_empty());
        assert_eq!(stored.printer.kind, PrinterKind::Network);
        assert_eq!(stored.printer.ip_address, "192.168.1.50");
    }

    #[test]
    fn tax_label_formats_rate() {
        let mut settings = Settings::default();
        assert_eq!(settings.tax_label(), "Tax (5%)");
        settings.tax_rate = 0.155;
        assert_eq!(settings.tax_label(), "Tax (15.5%)");
    }
}
