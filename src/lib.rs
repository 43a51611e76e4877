//! PadLink - network-to-virtual-controller input bridge
//!
//! Mirrors controller input received over UDP onto a locally registered
//! virtual game controller, so a remote sender can drive a host
//! application as if a physical controller were attached.
//!
//! Two worker threads share one lock-guarded slot:
//!
//! - the **receiver** validates incoming datagrams, tolerates packet loss
//!   and sleep/wake cycles, and commits the latest accepted packet;
//! - the **publisher** republishes the latest state to the virtual device
//!   at a fixed cadence, falling back to a neutral state when the link
//!   degrades.

pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod net;
pub mod publisher;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
