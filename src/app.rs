//! Application supervisor
//!
//! Attaches the virtual device, starts the receive and publish workers as
//! named OS threads, and keeps the process alive until a shutdown signal
//! arrives or a worker hits a fatal condition. The only shared mutable
//! resource between the workers is the input slot; the supervisor itself
//! only watches the running flag.
//!
//! Fatal errors never terminate the process from inside a worker: the
//! worker stores the error, clears the running flag, and the supervisor
//! propagates it to `main` after joining both threads.

use crate::config::Config;
use crate::device::create_sink;
use crate::error::{Error, Result};
use crate::net::identity::LocalHostIdentity;
use crate::net::receiver::PacketReceiver;
use crate::net::session::SessionManager;
use crate::publisher::StatePublisher;
use crate::state::SharedInput;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Supervision loop poll interval
const SUPERVISE_INTERVAL: Duration = Duration::from_millis(100);

/// Supervisor owning the worker lifetimes
pub struct PadLinkApp {
    config: Config,
    running: Arc<AtomicBool>,
    fatal: Arc<Mutex<Option<Error>>>,
}

impl PadLinkApp {
    pub fn new(config: Config) -> Self {
        PadLinkApp {
            config,
            running: Arc::new(AtomicBool::new(true)),
            fatal: Arc::new(Mutex::new(None)),
        }
    }

    /// Run until shutdown. Returns the first fatal worker error, if any.
    pub fn run(&mut self) -> Result<()> {
        // Attach before anything else runs; attach failure is fatal.
        let sink = create_sink(&self.config.device)?;

        let shared = SharedInput::new();
        let session = SessionManager::new(
            self.config.network.port,
            Box::new(LocalHostIdentity),
        );
        let mut receiver =
            PacketReceiver::new(session, shared.clone(), Arc::clone(&self.running));
        let mut publisher = StatePublisher::new(sink, shared, Arc::clone(&self.running));

        let running = Arc::clone(&self.running);
        ctrlc::set_handler(move || {
            log::info!("received shutdown signal");
            running.store(false, Ordering::Relaxed);
        })
        .map_err(|e| Error::Thread(format!("failed to set signal handler: {}", e)))?;

        let receiver_handle = self.spawn_worker("net-receiver", move || receiver.run())?;
        let publisher_handle = self.spawn_worker("pad-publisher", move || publisher.run())?;

        log::info!(
            "padlink running (UDP port {}). Press Ctrl-C to stop.",
            self.config.network.port
        );

        while self.running.load(Ordering::Relaxed) {
            thread::sleep(SUPERVISE_INTERVAL);
        }

        // Workers observe the cleared flag within one of their cycles.
        let _ = receiver_handle.join();
        let _ = publisher_handle.join();

        match self.fatal.lock().take() {
            Some(err) => Err(err),
            None => {
                log::info!("padlink stopped");
                Ok(())
            }
        }
    }

    fn spawn_worker<F>(&self, name: &str, work: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let running = Arc::clone(&self.running);
        let fatal = Arc::clone(&self.fatal);
        let label = name.to_string();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if let Err(err) = work() {
                    log::error!("{} terminated: {}", label, err);
                    let mut slot = fatal.lock();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    running.store(false, Ordering::Relaxed);
                }
            })
            .map_err(|e| Error::Thread(format!("failed to spawn {}: {}", name, e)))
    }
}
