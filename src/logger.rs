use crate::constants::TRACING_TARGET;

/// Sink for the diagnostic lines written around each verifyReceipt callout.
///
/// Calls are fire-and-forget and never affect control flow.
pub trait ReceiptLogger: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards receipt log lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ReceiptLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: TRACING_TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: TRACING_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: TRACING_TARGET, "{}", message);
    }
}
