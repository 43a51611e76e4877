//! Logging reference backend
//!
//! Mirrors the publish stream into the log instead of a host input
//! subsystem. Publishing at 181 Hz would swamp the log, so only state
//! transitions are reported, and only when debug logging is enabled.

use super::{ControllerSink, ControllerSnapshot, DeviceAppearance};
use crate::error::Result;

pub struct LogSink {
    last: Option<ControllerSnapshot>,
}

impl LogSink {
    pub fn attach(appearance: DeviceAppearance) -> Self {
        log::info!(
            "virtual controller attached (body #{:06X}, buttons #{:06X}, battery {}/4)",
            appearance.body_color,
            appearance.button_color,
            appearance.battery_level
        );
        LogSink { last: None }
    }
}

impl ControllerSink for LogSink {
    fn publish(&mut self, snapshot: &ControllerSnapshot) -> Result<()> {
        if self.last.as_ref() != Some(snapshot) {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "state: buttons={:#018x} L=({}, {}) R=({}, {})",
                    snapshot.buttons,
                    snapshot.left_stick.x,
                    snapshot.left_stick.y,
                    snapshot.right_stick.x,
                    snapshot.right_stick.y
                );
            }
            self.last = Some(*snapshot);
        }
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        log::info!("virtual controller detached");
        Ok(())
    }
}
