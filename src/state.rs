//! Shared latest-input slot
//!
//! Single lock-guarded slot holding the most recently accepted packet (or
//! the neutral sentinel). Written by the receive loop, read by the publish
//! loop; last writer wins, and readers always observe a complete packet.
//! Intermediate values may be overwritten before the publisher drains them;
//! only the latest known state matters for a continuous controller feed.

use crate::net::packet::InputPacket;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to the shared input slot
#[derive(Clone)]
pub struct SharedInput {
    slot: Arc<Mutex<InputPacket>>,
}

impl SharedInput {
    /// Create a slot holding the neutral sentinel
    pub fn new() -> Self {
        SharedInput {
            slot: Arc::new(Mutex::new(InputPacket::NEUTRAL)),
        }
    }

    /// Commit an accepted packet
    pub fn write(&self, packet: InputPacket) {
        *self.slot.lock() = packet;
    }

    /// Copy out the current packet
    pub fn read(&self) -> InputPacket {
        *self.slot.lock()
    }

    /// Force the slot back to the neutral sentinel
    pub fn reset(&self) {
        *self.slot.lock() = InputPacket::NEUTRAL;
    }
}

impl Default for SharedInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::packet::MAGIC;

    fn packet(buttons: u64) -> InputPacket {
        InputPacket {
            magic: MAGIC,
            buttons,
            left_x: 1,
            left_y: 2,
            right_x: 3,
            right_y: 4,
        }
    }

    #[test]
    fn test_starts_neutral() {
        let shared = SharedInput::new();
        assert_eq!(shared.read(), InputPacket::NEUTRAL);
    }

    #[test]
    fn test_write_read_round_trip() {
        let shared = SharedInput::new();
        let pkt = packet(0xDEAD_BEEF);
        shared.write(pkt);
        assert_eq!(shared.read(), pkt);
    }

    #[test]
    fn test_last_writer_wins() {
        let shared = SharedInput::new();
        shared.write(packet(1));
        shared.write(packet(2));
        assert_eq!(shared.read().buttons, 2);
    }

    #[test]
    fn test_reset_restores_sentinel() {
        let shared = SharedInput::new();
        shared.write(packet(1));
        shared.reset();
        assert_eq!(shared.read(), InputPacket::NEUTRAL);
    }

    #[test]
    fn test_clone_shares_slot() {
        let shared = SharedInput::new();
        let other = shared.clone();
        shared.write(packet(7));
        assert_eq!(other.read().buttons, 7);
    }
}
