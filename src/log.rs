//! Conditional logging macros.
//!
//! With the `tracing` feature these are the `tracing` macros; without it they
//! expand to nothing and their arguments are never evaluated.

use crate::errors::ProfileWarning;

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, info, warn};

/// Push a warning onto a batch and log it at `warn` level.
pub(crate) fn record(warnings: &mut Vec<ProfileWarning>, warning: ProfileWarning) {
    warn!(%warning, "profile warning");
    warnings.push(warning);
}
