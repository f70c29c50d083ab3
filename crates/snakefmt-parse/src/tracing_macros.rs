//! Logging macros for the parser. Without the `tracing` feature (and outside
//! tests) they expand to nothing, so the parser carries no logging cost.

/// Per-token and per-parameter events.
#[cfg(any(test, feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "snakefmt_parse", $($arg)*);
    };
}

#[cfg(not(any(test, feature = "tracing")))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Block structure events: blocks opened and closed.
#[cfg(any(test, feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "snakefmt_parse", $($arg)*);
    };
}

#[cfg(not(any(test, feature = "tracing")))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
