//! Host identity tracking for network-change detection
//!
//! The receive socket must be rebound when the host moves to a different
//! network (a new Wi-Fi association changes the local address and
//! invalidates the old binding). The session manager compares an opaque
//! identity token between passes; a change forces socket recreation.

use std::net::{SocketAddr, UdpSocket};

/// Documentation-range address used only for a kernel route lookup;
/// connecting a UDP socket sends no datagram.
const ROUTE_PROBE_ADDR: &str = "203.0.113.1:9";

/// Source of the host's current network identity token
pub trait HostIdentity: Send {
    /// Current identity token; 0 when it cannot be determined
    fn current(&mut self) -> u64;
}

/// Identity provider backed by the primary local IPv4 address.
///
/// A throwaway UDP socket is connected to a fixed probe address; the local
/// address the kernel selects for that route identifies the active network
/// interface and its current assignment.
pub struct LocalHostIdentity;

impl HostIdentity for LocalHostIdentity {
    fn current(&mut self) -> u64 {
        let Ok(socket) = UdpSocket::bind(("0.0.0.0", 0)) else {
            return 0;
        };
        if socket.connect(ROUTE_PROBE_ADDR).is_err() {
            return 0;
        }
        match socket.local_addr() {
            Ok(SocketAddr::V4(addr)) => u64::from(u32::from(*addr.ip())),
            _ => 0,
        }
    }
}

/// Scripted identity provider for tests: yields each token in order, then
/// repeats the last one.
#[cfg(test)]
pub(crate) struct ScriptedIdentity {
    tokens: Vec<u64>,
    next: usize,
}

#[cfg(test)]
impl ScriptedIdentity {
    pub(crate) fn new(tokens: &[u64]) -> Self {
        assert!(!tokens.is_empty());
        ScriptedIdentity {
            tokens: tokens.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl HostIdentity for ScriptedIdentity {
    fn current(&mut self) -> u64 {
        let token = self.tokens[self.next.min(self.tokens.len() - 1)];
        self.next += 1;
        token
    }
}
