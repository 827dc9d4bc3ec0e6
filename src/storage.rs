use crate::constants::{DATA_DIR_NAME, DOCUMENTS_DIR, SESSION_FILE};
use crate::identity::Session;
use crate::receipt::Receipt;
use anyhow::Result;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_RECENT_SALES: usize = 50;

/// Default data directory (`~/.posterm`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

/// Manages the persisted session, saved documents and recent sales
pub struct Storage {
    pub recent_sales: VecDeque<Receipt>,
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Storage {
            recent_sales: VecDeque::with_capacity(MAX_RECENT_SALES),
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Persist the signed-in session so the next start skips sign-in
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.ensure_dir(&self.data_dir)?;
        let content = serde_yaml::to_string(session)?;
        fs::write(self.data_dir.join(SESSION_FILE), content)?;
        Ok(())
    }

    pub fn load_session(&self) -> Option<Session> {
        let path = self.data_dir.join(SESSION_FILE);
        let content = fs::read_to_string(&path).ok()?;
        match serde_yaml::from_str::<Session>(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = self.data_dir.join(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Write a document (receipt, purchase order PDF) and return its path
    pub fn save_document(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.documents_dir();
        self.ensure_dir(&dir)?;
        let path = dir.join(sanitize_file_name(name));
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Document saved");
        Ok(path)
    }

    /// Remember a completed sale (newest first)
    pub fn add_sale(&mut self, receipt: Receipt) {
        if self.recent_sales.len() >= MAX_RECENT_SALES {
            self.recent_sales.pop_back();
        }
        self.recent_sales.push_front(receipt);
    }

    pub fn last_sale(&self) -> Option<&Receipt> {
        self.recent_sales.front()
    }

    pub fn sales_len(&self) -> usize {
        self.recent_sales.len()
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches('.').trim();
    if trimmed.is_empty() {
        String::from("document")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            uid: "uid-42".into(),
            email: "cashier@example.com".into(),
            id_token: "token".into(),
            refresh_token: "refresh".into(),
        }
    }

    #[test]
    fn session_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        assert!(storage.load_session().is_none());

        storage.save_session(&session()).unwrap();
        assert_eq!(storage.load_session(), Some(session()));

        storage.clear_session().unwrap();
        assert!(storage.load_session().is_none());
    }

    #[test]
    fn documents_land_in_documents_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let path = storage.save_document("../PO/7.pdf", b"%PDF").unwrap();
        assert_eq!(path.parent().unwrap(), storage.documents_dir());
        assert_eq!(path.file_name().unwrap(), "_PO_7.pdf");
        assert_eq!(fs::read(path).unwrap(), b"%PDF");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_file_name(".."), "document");
        assert_eq!(sanitize_file_name("Receipt_12.html"), "Receipt_12.html");
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/tmp/pos"), PathBuf::from("/tmp/pos"));
    }
}
