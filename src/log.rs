//! Logging for the converter.
//!
//! Parsing, generation and session transitions log through `debug!`, `trace!`
//! and `warn!` from this module. Building with the `tracing` feature (the MCP
//! server does) routes them to `tracing`; a plain library build drops the
//! calls at compile time.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, trace, warn};

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_structured_fields() {
        let frame = "0 0 24 24";
        super::debug!(frame = %frame, "resolved frame");
        super::trace!(children = 2, "element");
        super::warn!("plain message");
        assert_eq!(frame.len(), 9);
    }
}
