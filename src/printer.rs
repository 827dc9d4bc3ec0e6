//! Raw TCP receipt printers (port 9100 "JetDirect" style)

use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::{PrinterKind, PrinterSettings};

pub const TEST_PAGE: &str = "Printer test successful!";

#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error("Please enter IP address and port")]
    NotConfigured,

    #[error("Failed to connect to printer at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Printer at {0} did not respond in time")]
    Timeout(String),

    #[error("Failed to send data to printer: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Result<Self, PrinterError> {
        let host = host.into().trim().to_string();
        if host.is_empty() || port == 0 {
            return Err(PrinterError::NotConfigured);
        }
        Ok(NetworkPrinter { host, port, timeout })
    }

    /// Printer for the configured settings; `None` when printing is off
    pub fn from_settings(settings: &PrinterSettings, timeout: Duration) -> Result<Option<Self>, PrinterError> {
        match settings.kind {
            PrinterKind::None => Ok(None),
            PrinterKind::Network => {
                NetworkPrinter::new(settings.ip_address.clone(), settings.port, timeout).map(Some)
            }
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn send(&self, bytes: &[u8]) -> Result<(), PrinterError> {
        let addr = self.addr();
        tracing::debug!(%addr, bytes = bytes.len(), "Sending print job");

        let mut stream = match tokio::time::timeout(self.timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(PrinterError::Connect { addr, source }),
            Err(_) => return Err(PrinterError::Timeout(addr)),
        };

        let write = async {
            stream.write_all(bytes).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        match tokio::time::timeout(self.timeout, write).await {
            Ok(result) => result.map_err(PrinterError::from),
            Err(_) => Err(PrinterError::Timeout(addr)),
        }
    }

    pub async fn test_print(&self) -> Result<(), PrinterError> {
        let mut page = Vec::new();
        page.extend_from_slice(&[0x1B, 0x40]);
        page.extend_from_slice(TEST_PAGE.as_bytes());
        page.extend_from_slice(b"\n\n\n");
        self.send(&page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn missing_address_is_rejected() {
        let err = NetworkPrinter::new("  ", 9100, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err.to_string(), "Please enter IP address and port");
        assert!(NetworkPrinter::new("10.0.0.9", 0, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn kind_none_disables_printing() {
        let settings = PrinterSettings::default();
        assert!(NetworkPrinter::from_settings(&settings, Duration::from_secs(1))
            .unwrap()
            .is_none());

        let settings = PrinterSettings {
            kind: PrinterKind::Network,
            ip_address: "192.168.1.50".into(),
            ..PrinterSettings::default()
        };
        let printer = NetworkPrinter::from_settings(&settings, Duration::from_secs(1))
            .unwrap()
            .unwrap();
        assert_eq!(printer.addr(), "192.168.1.50:9100");
    }

    #[tokio::test]
    async fn test_print_reaches_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let reader = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            socket.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let printer = NetworkPrinter::new("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        printer.test_print().await.unwrap();

        let received = reader.await.unwrap();
        assert!(received.starts_with(&[0x1B, 0x40]));
        assert!(String::from_utf8_lossy(&received).contains(TEST_PAGE));
    }

    #[tokio::test]
    async fn refused_connection_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let printer = NetworkPrinter::new("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        let err = printer.send(b"x").await.unwrap_err();
        assert!(matches!(err, PrinterError::Connect { .. }));
    }
}
