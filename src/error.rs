//! Error types for PadLink
//!
//! Every variant that escapes a component is fatal: the supervisor maps it
//! to a process exit. Recoverable receive conditions (timeouts, malformed
//! datagrams) never become an `Error`; they only advance the failure
//! counter in the receive loop.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// PadLink error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UDP socket creation or bind failed
    #[error("Socket setup failed: {0}")]
    SocketSetup(std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// Virtual device could not be attached
    #[error("Device attach failed: {0}")]
    DeviceAttach(String),

    /// Virtual device rejected a published state
    #[error("Device publish failed: {0}")]
    DevicePublish(String),

    /// Worker thread could not be started
    #[error("Thread spawn failed: {0}")]
    Thread(String),
}
