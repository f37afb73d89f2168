//! Diagnostic tracing, kept separate from the user-facing console lines.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level follows the `-v` count:
/// warnings only by default, `debug` for `-v`, `trace` for `-vv` and above.
pub fn init_logger(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "sortdrop=debug",
        _ => "sortdrop=trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Keep whichever subscriber was installed first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
