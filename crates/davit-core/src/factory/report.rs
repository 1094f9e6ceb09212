//! The failure-reporting sink injected into factories.
//!
//! Factories forward load and execution failures here in addition to
//! propagating them; the sink observes, it never recovers. The sink is a
//! constructor argument so there is no window in which a factory exists
//! without somewhere to report to.

use tracing::error;

/// Receiver for unrecoverable factory errors.
pub trait FailureReporter: Send + Sync {
    /// Record one failure. Implementations must not panic and must not
    /// block the caller for long; delivery is fire-and-forget.
    fn report(&self, error: &(dyn std::error::Error + 'static));
}

/// Default reporter: forwards to `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, error: &(dyn std::error::Error + 'static)) {
        match error.source() {
            Some(cause) => error!(error = %error, cause = %cause, "verticle failure reported"),
            None => error!(error = %error, "verticle failure reported"),
        }
    }
}
