use std::path::Path;

use serde::{Deserialize, Serialize};

/// Transport layer for ZeroMQ connections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "address")]
pub enum Transport {
    /// Inter-process communication via Unix domain sockets.
    /// Fastest option for same-host worker/caller pairs.
    Ipc(String),

    /// TCP transport, e.g. when the caller embeds the worker remotely.
    Tcp { host: String, port: u16 },
}

impl Transport {
    /// Create an IPC transport with the given socket name.
    ///
    /// The name is used as a path component under `/tmp/semsplit/`.
    pub fn ipc(name: &str) -> Self {
        Self::Ipc(name.to_string())
    }

    /// Create a TCP transport with the given host and port.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Parse a ZeroMQ-style endpoint string (`tcp://host:port` or `ipc://name`).
    pub fn parse(endpoint: &str) -> Option<Self> {
        if let Some(rest) = endpoint.strip_prefix("tcp://") {
            let (host, port) = rest.rsplit_once(':')?;
            return Some(Self::tcp(host, port.parse().ok()?));
        }
        if let Some(name) = endpoint.strip_prefix("ipc://") {
            return Some(Self::ipc(name));
        }
        None
    }

    /// Generate the ZeroMQ endpoint address string.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Ipc(name) => format!("ipc:///tmp/semsplit/{name}.sock"),
            Self::Tcp { host, port } => format!("tcp://{host}:{port}"),
        }
    }

    /// For IPC transports, ensure the parent directory exists.
    ///
    /// ZeroMQ requires the directory to exist before binding an IPC socket.
    /// This is a no-op for TCP transports.
    pub fn ensure_ipc_dir(&self) -> std::io::Result<()> {
        if let Self::Ipc(_) = self {
            let endpoint = self.endpoint();
            let path = endpoint.strip_prefix("ipc://").unwrap_or(&endpoint);
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Remove a stale IPC socket file left over from a previous run.
    ///
    /// ZeroMQ IPC sockets are regular files — if the process exits
    /// without cleanup, the `.sock` file persists and causes
    /// `EADDRINUSE` on the next bind. No-op for TCP.
    pub fn remove_stale_socket(&self) -> std::io::Result<()> {
        if let Self::Ipc(_) = self {
            let endpoint = self.endpoint();
            let path = endpoint.strip_prefix("ipc://").unwrap_or(&endpoint);
            match std::fs::remove_file(path) {
                Ok(()) => {
                    tracing::debug!(path, "removed stale IPC socket");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipc_endpoint() {
        let t = Transport::ipc("results");
        assert_eq!(t.endpoint(), "ipc:///tmp/semsplit/results.sock");
    }

    #[test]
    fn tcp_endpoint() {
        let t = Transport::tcp("127.0.0.1", 7765);
        assert_eq!(t.endpoint(), "tcp://127.0.0.1:7765");
    }

    #[test]
    fn parse_tcp() {
        let t = Transport::parse("tcp://127.0.0.1:7765").unwrap();
        assert_eq!(t, Transport::tcp("127.0.0.1", 7765));
    }

    #[test]
    fn parse_ipc() {
        let t = Transport::parse("ipc://results").unwrap();
        assert_eq!(t, Transport::ipc("results"));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Transport::parse("http://nope").is_none());
        assert!(Transport::parse("tcp://noport").is_none());
    }

    #[test]
    fn display_matches_endpoint() {
        let t = Transport::tcp("localhost", 9090);
        assert_eq!(t.to_string(), t.endpoint());
    }
}
