//! Failure sinks: where records go once a failure is caught.

use crate::failure::FailureRecord;

/// Destination for failure records.
///
/// The layer depends only on this narrow contract. Implementations must be
/// safe to call concurrently from multiple threads, must not block, and must
/// not panic — the guard and the terminal hook swallow sink panics, but a
/// well-behaved sink never produces one. `record` is fire-and-forget: there
/// is no return value because there is nothing a failing caller could do
/// with one.
pub trait FailureSink: Send + Sync {
    fn record(&self, record: &FailureRecord);
}

/// Sink that emits one `tracing` error event per record.
///
/// Events carry the boundary tag, the classification, and the backtrace as
/// structured fields under the `crashguard` target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, record: &FailureRecord) {
        tracing::error!(
            target: "crashguard",
            boundary = %record.boundary,
            kind = %record.kind,
            backtrace = %record.backtrace,
            "contained failure: {}",
            record.message,
        );
    }
}

/// Sink that discards every record: the log of last resort.
#[derive(Debug, Default)]
pub struct NoopSink;

impl FailureSink for NoopSink {
    fn record(&self, _record: &FailureRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;

    #[test]
    fn tracing_sink_emits_without_panicking() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let record = FailureRecord::new(
            "app.widget.render",
            FailureKind::NoneUnwrap,
            "called `Option::unwrap()` on a `None` value",
            "",
        );
        TracingSink.record(&record);
        NoopSink.record(&record);
    }
}
