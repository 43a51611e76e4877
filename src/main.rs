//! PadLink - network-to-virtual-controller input bridge daemon
//!
//! Listens for controller input datagrams on a UDP port and mirrors them
//! onto a virtual game controller registered with the host input system.
//! One datagram carries one complete controller snapshot; the latest
//! accepted snapshot is republished to the device at a fixed cadence, with
//! a neutral fallback when the link degrades.

use padlink::app::PadLinkApp;
use padlink::config::Config;
use padlink::Result;
use std::env;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Settle delay before attaching the virtual device, giving the host's
/// network stack time to come up when started at boot
const STARTUP_SETTLE: Duration = Duration::from_secs(2);

/// Parse config path from command line arguments.
///
/// Supports:
/// - `padlink <path>` (positional)
/// - `padlink --config <path>` (flag-based)
/// - `padlink -c <path>` (short flag)
///
/// Defaults to `/etc/padlink.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "/etc/padlink.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let (config, config_found) = if Path::new(&config_path).exists() {
        (Config::load(&config_path)?, true)
    } else {
        (Config::defaults(), false)
    };

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    log::info!("padlink v{} starting...", env!("CARGO_PKG_VERSION"));
    if config_found {
        log::info!("using config: {}", config_path);
    } else {
        log::info!("config {} not found, using defaults", config_path);
    }

    log::info!("settling for {:?} before device attach", STARTUP_SETTLE);
    thread::sleep(STARTUP_SETTLE);

    PadLinkApp::new(config).run()
}
