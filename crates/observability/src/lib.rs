//! Process-wide tracing setup.

/// Initialize tracing with the format selected by `WARDEN_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

pub mod tracing;
