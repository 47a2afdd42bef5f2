//! Umbrella crate for the AIDA conference assistant.
//!
//! Re-exports every workspace crate under a short module name and owns the
//! `aida` server binary.

/// Re-export for convenience.
pub use aida_rs_config as config;
pub use aida_rs_core as core;
/// Re-export for convenience.
pub use aida_rs_conversations as conversations;
/// Re-export for convenience.
pub use aida_rs_protocol as protocol;
pub use aida_rs_retrieval as retrieval;
pub use aida_rs_server as server;

#[inline]
/// Install env_logger as the `log` backend when the "logging" feature is on.
///
/// Filters come from `RUST_LOG`. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
