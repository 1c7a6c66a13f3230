//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Number of threads requested on the first page load.
pub const THREAD_PAGE_SIZE: u32 = 20;

/// How much the requested page size grows on each load-more step.
pub const PAGE_SIZE_STEP: u32 = 20;

/// Selection distance from the end of the list that triggers loading more.
pub const LOAD_MORE_THRESHOLD: usize = 5;

/// Loaded-thread count at which the footer starts adding commentary.
pub const ENCOURAGEMENT_THRESHOLD: usize = 100;

/// Maximum retry delay in seconds for the startup auth probe.
pub const MAX_RETRY_DELAY_SECS: u64 = 30;

/// Maximum number of auth probe attempts before giving up.
pub const MAX_AUTH_RETRIES: u32 = 3;

/// Initial retry delay in milliseconds for the startup auth probe.
pub const AUTH_RETRY_DELAY_MS: u64 = 500;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// HTTP request timeout in seconds for all API calls.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Column width at which HTML message bodies are re-wrapped as text.
pub const BODY_WRAP_COLS: usize = 80;

// === UI Constants ===

/// Input poll timeout in milliseconds while a load is in flight.
/// Short enough to keep the spinner animating.
pub const POLL_FAST_MS: u64 = 50;

/// Input poll timeout in milliseconds when idle.
pub const POLL_IDLE_MS: u64 = 150;

/// Target scroll position as fraction of visible area (1/N from top).
/// A value of 4 means the selected item targets 1/4 from the top.
pub const SCROLL_TARGET_FRACTION: usize = 4;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;
