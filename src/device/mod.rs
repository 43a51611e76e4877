//! Virtual controller sink boundary
//!
//! The host input subsystem sits behind the [`ControllerSink`] trait:
//! attach happens when a backend is constructed, every publish cycle pushes
//! one [`ControllerSnapshot`], and detach releases the registration. Attach
//! and publish failures are fatal — a broken device handle cannot
//! self-heal, so the daemon stops rather than retry.
//!
//! Shipped backends:
//! - `log` — reference backend, logs state transitions
//! - `mock` — recording backend used by tests and dry runs
//!
//! A host platform integration (uinput, hiddbg, ViGEm, …) is a further
//! implementation of the same trait.

mod log;
mod mock;

pub use self::log::LogSink;
pub use self::mock::MockSink;

use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::net::packet::InputPacket;

/// 2D analog stick deflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickPosition {
    pub x: i32,
    pub y: i32,
}

/// One controller state pushed to the host input system per publish cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerSnapshot {
    /// Bitmask of pressed buttons
    pub buttons: u64,
    pub left_stick: StickPosition,
    pub right_stick: StickPosition,
}

impl ControllerSnapshot {
    /// All buttons released, both sticks centered
    pub const NEUTRAL: ControllerSnapshot = ControllerSnapshot {
        buttons: 0,
        left_stick: StickPosition { x: 0, y: 0 },
        right_stick: StickPosition { x: 0, y: 0 },
    };

    /// Derive the snapshot for a shared-slot packet. The sentinel maps to
    /// the neutral snapshot; live packets are mirrored field for field.
    pub fn from_packet(packet: &InputPacket) -> Self {
        if !packet.is_live() {
            return Self::NEUTRAL;
        }
        ControllerSnapshot {
            buttons: packet.buttons,
            left_stick: StickPosition {
                x: packet.left_x,
                y: packet.left_y,
            },
            right_stick: StickPosition {
                x: packet.right_x,
                y: packet.right_y,
            },
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Identity metadata handed to the host when the device is attached
#[derive(Debug, Clone, Copy)]
pub struct DeviceAppearance {
    pub body_color: u32,
    pub button_color: u32,
    pub left_grip_color: u32,
    pub right_grip_color: u32,
    pub battery_level: u8,
}

impl From<&DeviceConfig> for DeviceAppearance {
    fn from(config: &DeviceConfig) -> Self {
        DeviceAppearance {
            body_color: config.body_color,
            button_color: config.button_color,
            left_grip_color: config.left_grip_color,
            right_grip_color: config.right_grip_color,
            battery_level: config.battery_level,
        }
    }
}

/// Sink for mirrored controller state
pub trait ControllerSink: Send {
    /// Push one snapshot to the host input system. An error here is fatal.
    fn publish(&mut self, snapshot: &ControllerSnapshot) -> Result<()>;

    /// Release the virtual device registration
    fn detach(&mut self) -> Result<()>;
}

/// Attach the configured sink backend. Unknown backends and backend attach
/// failures are fatal.
pub fn create_sink(config: &DeviceConfig) -> Result<Box<dyn ControllerSink>> {
    let appearance = DeviceAppearance::from(config);
    match config.backend.as_str() {
        "log" => Ok(Box::new(LogSink::attach(appearance))),
        "mock" => Ok(Box::new(MockSink::new())),
        other => Err(Error::DeviceAttach(format!(
            "unknown sink backend '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::net::packet::MAGIC;

    #[test]
    fn test_sentinel_maps_to_neutral() {
        let snapshot = ControllerSnapshot::from_packet(&InputPacket::NEUTRAL);
        assert!(snapshot.is_neutral());
    }

    #[test]
    fn test_live_packet_is_mirrored() {
        let packet = InputPacket {
            magic: MAGIC,
            buttons: 0b101,
            left_x: 100,
            left_y: -7,
            right_x: 42,
            right_y: 9000,
        };
        let snapshot = ControllerSnapshot::from_packet(&packet);
        assert_eq!(snapshot.buttons, 0b101);
        assert_eq!(snapshot.left_stick, StickPosition { x: 100, y: -7 });
        assert_eq!(snapshot.right_stick, StickPosition { x: 42, y: 9000 });
    }

    #[test]
    fn test_create_sink_known_backends() {
        let mut config = Config::defaults().device;
        assert!(create_sink(&config).is_ok());

        config.backend = "mock".to_string();
        assert!(create_sink(&config).is_ok());
    }

    #[test]
    fn test_create_sink_unknown_backend_is_fatal() {
        let mut config = Config::defaults().device;
        config.backend = "hdls".to_string();
        assert!(matches!(
            create_sink(&config),
            Err(Error::DeviceAttach(_))
        ));
    }
}
