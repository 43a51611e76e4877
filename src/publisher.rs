//! Fixed-cadence controller state publisher
//!
//! Runs on its own thread and republishes the latest shared input to the
//! virtual device every cycle, whether or not anything changed. The cadence
//! is slightly faster than the host's expected input poll rate so the
//! device never appears stale. When the shared slot holds the sentinel the
//! published snapshot is neutral — the fail-safe for a degraded link.

use crate::device::{ControllerSink, ControllerSnapshot};
use crate::error::Result;
use crate::state::SharedInput;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Publish period: marginally above the host's 180 Hz input poll rate
const PUBLISH_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 181);

/// Cycle time beyond which an overrun warning is logged
const OVERRUN_WARN: Duration = Duration::from_millis(10);

/// Publishes the shared input state to a controller sink at a fixed cadence
pub struct StatePublisher {
    sink: Box<dyn ControllerSink>,
    shared: SharedInput,
    running: Arc<AtomicBool>,
}

impl StatePublisher {
    pub fn new(
        sink: Box<dyn ControllerSink>,
        shared: SharedInput,
        running: Arc<AtomicBool>,
    ) -> Self {
        StatePublisher {
            sink,
            shared,
            running,
        }
    }

    /// Build and push one snapshot. A sink error is fatal: the device
    /// handle is assumed invalid and no retry is attempted.
    pub fn publish_cycle(&mut self) -> Result<()> {
        let snapshot = ControllerSnapshot::from_packet(&self.shared.read());
        self.sink.publish(&snapshot)
    }

    /// Publish loop: one cycle per [`PUBLISH_PERIOD`] until the running
    /// flag clears, then detach the device.
    pub fn run(&mut self) -> Result<()> {
        log::info!("publisher loop started (period {:?})", PUBLISH_PERIOD);

        while self.running.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            self.publish_cycle()?;

            let elapsed = cycle_start.elapsed();
            if elapsed < PUBLISH_PERIOD {
                thread::sleep(PUBLISH_PERIOD - elapsed);
            } else if elapsed > OVERRUN_WARN {
                log::warn!("publish cycle overrun: {:?} (target {:?})", elapsed, PUBLISH_PERIOD);
            }
        }

        self.sink.detach()?;
        log::info!("publisher loop stopped, device detached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MockSink, StickPosition};
    use crate::error::Error;
    use crate::net::packet::{InputPacket, MAGIC};

    fn publisher_with(sink: MockSink) -> (StatePublisher, SharedInput, Arc<AtomicBool>) {
        let shared = SharedInput::new();
        let running = Arc::new(AtomicBool::new(true));
        (
            StatePublisher::new(Box::new(sink.clone()), shared.clone(), Arc::clone(&running)),
            shared,
            running,
        )
    }

    #[test]
    fn test_sentinel_publishes_neutral() {
        let sink = MockSink::new();
        let (mut publisher, _shared, _running) = publisher_with(sink.clone());

        publisher.publish_cycle().unwrap();
        assert!(sink.last().unwrap().is_neutral());
    }

    #[test]
    fn test_live_packet_publishes_mirrored_snapshot() {
        let sink = MockSink::new();
        let (mut publisher, shared, _running) = publisher_with(sink.clone());

        shared.write(InputPacket {
            magic: MAGIC,
            buttons: 0x0001,
            left_x: 100,
            left_y: 0,
            right_x: 0,
            right_y: 0,
        });
        publisher.publish_cycle().unwrap();

        let snapshot = sink.last().unwrap();
        assert_eq!(snapshot.buttons, 0x0001);
        assert_eq!(snapshot.left_stick, StickPosition { x: 100, y: 0 });
        assert_eq!(snapshot.right_stick, StickPosition { x: 0, y: 0 });
    }

    #[test]
    fn test_slot_reset_returns_output_to_neutral() {
        let sink = MockSink::new();
        let (mut publisher, shared, _running) = publisher_with(sink.clone());

        shared.write(InputPacket {
            magic: MAGIC,
            buttons: 0xFF,
            left_x: 1,
            left_y: 1,
            right_x: 1,
            right_y: 1,
        });
        publisher.publish_cycle().unwrap();
        assert!(!sink.last().unwrap().is_neutral());

        shared.reset();
        publisher.publish_cycle().unwrap();
        assert!(sink.last().unwrap().is_neutral());
    }

    #[test]
    fn test_publish_failure_is_fatal() {
        let (mut publisher, _shared, _running) = publisher_with(MockSink::failing());
        assert!(matches!(
            publisher.publish_cycle(),
            Err(Error::DevicePublish(_))
        ));
    }

    #[test]
    fn test_run_detaches_on_shutdown() {
        let sink = MockSink::new();
        let (mut publisher, _shared, running) = publisher_with(sink.clone());

        let handle = thread::spawn(move || publisher.run());
        thread::sleep(Duration::from_millis(30));
        running.store(false, Ordering::Relaxed);

        handle.join().unwrap().unwrap();
        assert!(sink.detached());
        assert!(!sink.published().is_empty());
    }

    #[test]
    fn test_run_stops_on_publish_failure() {
        let (mut publisher, _shared, _running) = publisher_with(MockSink::failing());
        assert!(publisher.run().is_err());
    }
}
