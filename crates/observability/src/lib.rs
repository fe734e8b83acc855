//! Process-wide tracing setup shared by the LMS client binaries.

/// Initialize tracing/logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Tracing subscriber configuration.
pub mod tracing;

pub use self::tracing::LogFormat;
