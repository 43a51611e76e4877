//! Packet receive loop: validation, failure counting, backoff
//!
//! `poll_once` performs one bounded receive pass and never blocks longer
//! than the session's receive timeout. Failure policy:
//!
//! | consecutive misses | effect                                   |
//! |--------------------|------------------------------------------|
//! | 1..=5              | tolerated, last accepted packet stays up |
//! | > 5                | shared slot forced to the neutral sentinel |
//! | > 30               | reads throttled to 1 in 5 attempts       |
//!
//! A short glitch therefore never blanks the controller, sustained loss
//! fails safe to neutral, and a persistently dead link stops burning
//! receive calls. Any accepted packet resets the counter and leaves the
//! throttled state.

use crate::error::Result;
use crate::net::packet::{InputPacket, PACKET_SIZE};
use crate::net::session::SessionManager;
use crate::state::SharedInput;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Consecutive misses tolerated before the slot is forced neutral
const NEUTRAL_AFTER_MISSES: u64 = 5;

/// Consecutive misses after which reads are throttled
const THROTTLE_AFTER_MISSES: u64 = 30;

/// While throttled, only every Nth attempt performs a real read
const THROTTLE_STRIDE: u64 = 5;

/// Idle pause after a pass that produced no packet
const IDLE_PAUSE: Duration = Duration::from_millis(10);

/// Result of one receive pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A valid packet was committed to the shared slot
    Accepted,
    /// Timeout, malformed datagram, or transient socket error
    Rejected,
    /// Backoff gate skipped the read entirely
    Throttled,
}

/// Receives, validates, and commits input datagrams
pub struct PacketReceiver {
    session: SessionManager,
    shared: SharedInput,
    running: Arc<AtomicBool>,
    failures: u64,
    // One byte larger than a packet so oversized datagrams are detectable
    // instead of being silently truncated to a valid length.
    scratch: [u8; PACKET_SIZE + 1],
}

impl PacketReceiver {
    pub fn new(session: SessionManager, shared: SharedInput, running: Arc<AtomicBool>) -> Self {
        PacketReceiver {
            session,
            shared,
            running,
            failures: 0,
            scratch: [0u8; PACKET_SIZE + 1],
        }
    }

    /// Perform one receive pass.
    ///
    /// Recoverable conditions (timeouts, malformed datagrams, transient
    /// socket errors) only advance the failure counter; the sole fatal
    /// path is session recreation failing.
    pub fn poll_once(&mut self) -> Result<PollOutcome> {
        let socket = self.session.ensure_session()?;

        // Backoff gate: once the link is persistently down, perform a real
        // read only on every 5th attempt.
        if self.failures > THROTTLE_AFTER_MISSES && self.failures % THROTTLE_STRIDE != 0 {
            self.failures += 1;
            return Ok(PollOutcome::Throttled);
        }

        let received = match socket.recv_from(&mut self.scratch) {
            Ok((len, _peer)) => Some(len),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => None,
            Err(e) => {
                // Counted like any other miss; the session manager decides
                // whether the socket itself needs replacing.
                log::debug!("recv error: {}", e);
                None
            }
        };

        let packet = received.and_then(|len| InputPacket::decode(&self.scratch[..len]));

        match packet {
            Some(pkt) => {
                self.shared.write(pkt);
                if self.failures > NEUTRAL_AFTER_MISSES {
                    log::info!("input restored after {} missed reads", self.failures);
                }
                self.failures = 0;
                Ok(PollOutcome::Accepted)
            }
            None => {
                self.failures += 1;
                if self.failures == NEUTRAL_AFTER_MISSES + 1 {
                    log::warn!(
                        "no valid input for {} reads, forcing neutral state",
                        self.failures
                    );
                }
                if self.failures > NEUTRAL_AFTER_MISSES {
                    self.shared.reset();
                }
                if self.failures == THROTTLE_AFTER_MISSES + 1 {
                    log::warn!(
                        "link appears down, throttling reads to 1 in {}",
                        THROTTLE_STRIDE
                    );
                }
                Ok(PollOutcome::Rejected)
            }
        }
    }

    /// Network loop: poll until the running flag clears.
    ///
    /// A successful pass yields the processor and loops immediately; an
    /// empty pass pauses briefly to avoid a hot spin.
    pub fn run(&mut self) -> Result<()> {
        log::info!("receiver loop started");

        while self.running.load(Ordering::Relaxed) {
            match self.poll_once()? {
                PollOutcome::Accepted => thread::yield_now(),
                PollOutcome::Rejected | PollOutcome::Throttled => thread::sleep(IDLE_PAUSE),
            }
        }

        log::info!("receiver loop stopped");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn failures(&self) -> u64 {
        self.failures
    }

    #[cfg(test)]
    pub(crate) fn set_failures(&mut self, failures: u64) {
        self.failures = failures;
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &SessionManager {
        &self.session
    }
}
