//! DrishtiTeleop - Operator console for a remote-controlled robot car
//!
//! ## Link Architecture
//!
//! - **TCP uplink (robot port 5556)**: MessagePack drive commands, fire-and-forget
//! - **TCP downlink (robot port 6665)**: raw BGR video frames, latest-frame-wins
//!
//! Drive with W/A/S/D, select the speed factor with 1/2/3, capture the
//! current frame with P, quit with Q or by closing the window.

use drishti_teleop::app::TeleopApp;
use drishti_teleop::config::{AppConfig, ConfigSource};
use drishti_teleop::error::Result;
use std::env;

/// Config path used when none is passed on the command line
const DEFAULT_CONFIG_PATH: &str = "drishti-teleop.toml";

/// Parse config path from command line arguments.
///
/// Supports:
/// - `drishti-teleop <path>` (positional)
/// - `drishti-teleop --config <path>` (flag-based)
/// - `drishti-teleop -c <path>` (short flag)
///
/// Returns `None` when no path was passed; the caller then tries
/// [`DEFAULT_CONFIG_PATH`].
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    None
}

fn main() -> Result<()> {
    // An explicitly passed path must exist; only the implicit default may
    // fall back to built-in defaults
    let explicit = parse_config_path();
    let (config, source) = AppConfig::resolve(explicit.as_deref(), DEFAULT_CONFIG_PATH)?;

    // Initialize logger with the configured default level; RUST_LOG overrides
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("DrishtiTeleop v{} starting...", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => log::info!("Using config: {}", path),
        ConfigSource::BuiltinDefaults => log::warn!(
            "Config {} not found, using built-in defaults",
            DEFAULT_CONFIG_PATH
        ),
    }
    log::info!(
        "Robot: commands -> {}, frames <- {}",
        config.network.command_address,
        config.network.frame_address
    );

    let mut app = TeleopApp::new(config);
    app.run()?;

    log::info!("DrishtiTeleop stopped");
    Ok(())
}
