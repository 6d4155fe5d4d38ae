//! Server identity used to key cache files

use std::fmt;

/// One server, identified by host and port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerKey {
    pub host: String,
    pub port: u16,
}

impl ServerKey {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// File name for this server's cache
    ///
    /// "10.0.0.112", 25575 → "10.0.0.112_25575.json". Characters outside
    /// `[A-Za-z0-9.-]` become `_` so IPv6 hosts and odd names stay valid
    /// file names.
    pub fn file_name(&self) -> String {
        let host: String = self
            .host
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        format!("{}_{}.json", host, self.port)
    }
}

impl fmt::Display for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
