//! UDP session lifecycle management
//!
//! Owns the receive socket and decides when it must be torn down and
//! rebound. Reset triggers, evaluated in order, any one forcing
//! recreation:
//!
//! 1. No session currently open (first call).
//! 2. The receive loop has not passed through here within
//!    [`INACTIVITY_THRESHOLD`] — the device was suspended and the socket's
//!    buffered state is stale. A [`RESUME_SETTLE`] delay lets the network
//!    stack come back before rebinding.
//! 3. The host identity token changed since the last pass — a different
//!    network association invalidated the old binding.
//!
//! The identity token and pass timestamp are recorded on every call, not
//! only on recreation, so triggers 2 and 3 always compare against fresh
//! values. Socket creation failure is unrecoverable and propagates to the
//! supervisor.

use crate::error::{Error, Result};
use crate::net::identity::HostIdentity;
use std::net::{Ipv4Addr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

/// Inactivity window after which the socket is presumed stale (device slept)
pub const INACTIVITY_THRESHOLD: Duration = Duration::from_millis(320);

/// Settle delay before rebinding after a suspected sleep/wake cycle
pub const RESUME_SETTLE: Duration = Duration::from_millis(500);

/// Receive timeout applied to every session socket
pub const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Session timing parameters; production code uses the defaults, tests
/// construct tighter values
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    pub inactivity_threshold: Duration,
    pub resume_settle: Duration,
    pub recv_timeout: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        SessionTiming {
            inactivity_threshold: INACTIVITY_THRESHOLD,
            resume_settle: RESUME_SETTLE,
            recv_timeout: RECV_TIMEOUT,
        }
    }
}

/// Manages the UDP receive endpoint across sleep/wake cycles and network
/// identity changes
pub struct SessionManager {
    port: u16,
    timing: SessionTiming,
    identity: Box<dyn HostIdentity>,
    socket: Option<UdpSocket>,
    last_host: u64,
    last_pass: Option<Instant>,
    generation: u64,
}

impl SessionManager {
    /// Create a manager with production timing
    pub fn new(port: u16, identity: Box<dyn HostIdentity>) -> Self {
        Self::with_timing(port, identity, SessionTiming::default())
    }

    /// Create a manager with explicit timing
    pub fn with_timing(port: u16, identity: Box<dyn HostIdentity>, timing: SessionTiming) -> Self {
        SessionManager {
            port,
            timing,
            identity,
            socket: None,
            last_host: 0,
            last_pass: None,
            generation: 0,
        }
    }

    /// Return an open session socket, recreating it if a reset trigger
    /// fired. Idempotent otherwise: a stable session is returned unchanged.
    pub fn ensure_session(&mut self) -> Result<&UdpSocket> {
        let mut rebind = self.socket.is_none();
        if rebind {
            log::info!("creating UDP session");
        }

        if !rebind {
            if let Some(last) = self.last_pass {
                let stalled = last.elapsed();
                if stalled > self.timing.inactivity_threshold {
                    log::warn!(
                        "receive loop stalled for {:?}, resetting socket (suspected sleep/wake)",
                        stalled
                    );
                    thread::sleep(self.timing.resume_settle);
                    rebind = true;
                }
            }
        }

        let host = self.identity.current();
        if !rebind && host != self.last_host {
            log::info!(
                "host identity changed ({:#010x} -> {:#010x}), resetting socket",
                self.last_host,
                host
            );
            rebind = true;
        }

        if rebind {
            // Dropping the old socket closes its descriptor before the
            // replacement binds the same port.
            self.socket = None;
            let socket = self.open_socket()?;
            self.generation += 1;
            self.socket = Some(socket);
        }

        self.last_host = host;
        self.last_pass = Some(Instant::now());

        match &self.socket {
            Some(socket) => Ok(socket),
            // rebind installs a socket on success; kept for totality
            None => Err(Error::SocketSetup(std::io::Error::other(
                "session not open",
            ))),
        }
    }

    fn open_socket(&self) -> Result<UdpSocket> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, self.port))
            .map_err(Error::SocketSetup)?;
        socket
            .set_read_timeout(Some(self.timing.recv_timeout))
            .map_err(Error::SocketSetup)?;

        match socket.local_addr() {
            Ok(addr) => log::info!(
                "UDP session bound on {} (recv timeout {:?})",
                addr,
                self.timing.recv_timeout
            ),
            Err(_) => log::info!("UDP session bound (recv timeout {:?})", self.timing.recv_timeout),
        }

        Ok(socket)
    }

    /// Number of times a socket has been created since startup
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Local address of the current session socket, if one is open
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }
}
