//! Console diagnostics.

use tracing::Level;

/// Install the stderr subscriber used by both binaries.
///
/// Progress goes to stderr at INFO; user-facing results stay on stdout.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
