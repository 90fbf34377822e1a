//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use crate::parser::DEFAULT_BUFFER_SIZE;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// Initial size of each connection's request buffer. It doubles as needed.
    pub read_buffer_size: usize,
}

impl ServerConfig {
    /// Listen on every interface at `port`. Port 0 picks an ephemeral port.
    pub fn with_port(port: u16) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            read_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
