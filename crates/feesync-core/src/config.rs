//! Session configuration.

/// Tunables for a [`crate::FeeSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Trailing debounce window for filter-driven reloads, in
    /// milliseconds. Every reload-relevant filter change rearms the
    /// timer; the reload fires once the filters have been quiet this
    /// long.
    pub debounce_ms: u64,
    /// How long success notices stay visible, in milliseconds.
    pub success_notice_ms: u64,
    /// How long error and warning notices stay visible, in
    /// milliseconds.
    pub error_notice_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            debounce_ms: 300,
            success_notice_ms: 5000,
            error_notice_ms: 10000,
        }
    }
}
