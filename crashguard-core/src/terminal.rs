//! Terminal handler: the process-wide last-resort sink for panics that
//! escape every guard.
//!
//! The handler observes before death, it never prevents it. After the record
//! is delivered, the previously installed hook runs and the platform's
//! default behavior (unwind to thread death, or abort) proceeds unaltered.
//!
//! The handler is one process-wide slot. [`install`] replaces any sink
//! installed earlier — most recent wins, handlers do not chain — and
//! [`reset`] empties the slot. This is a known limitation inherited from the
//! platform: a process has exactly one panic hook.
//!
//! The hook may run concurrently on several panicking threads. It therefore
//! takes no locks: the sink slot is read with an atomic swap primitive and
//! the containment-scope check is thread-local. A sink used here must not
//! panic; a panic raised while the hook runs aborts the process before any
//! recovery is possible.

use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};
use std::sync::{Arc, Once, OnceLock};

use arc_swap::ArcSwapOption;

use crate::classify::{classify, message_of};
use crate::failure::{FailureKind, FailureRecord};
use crate::guard;
use crate::sink::FailureSink;

/// Thin wrapper so the slot holds a word-sized pointer; `ArcSwap` cannot
/// store a trait-object `Arc` directly.
struct SinkSlot(Arc<dyn FailureSink>);

/// The single process-wide sink slot. Lock-free on the panic path.
static SINK: ArcSwapOption<SinkSlot> = ArcSwapOption::const_empty();

/// Installs the std panic hook exactly once per process.
static HOOK: Once = Once::new();

/// The hook that was active before ours; delegated to for every panic we do
/// not silence, so default stderr reporting stays intact.
static PREVIOUS: OnceLock<Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync>> = OnceLock::new();

/// Install `sink` as the uncaught-failure sink for the whole process.
///
/// Idempotent-safe: calling again replaces the sink, never duplicates it.
/// Intended to be called once during host startup, before any guarded work
/// runs.
pub fn install(sink: Arc<dyn FailureSink>) {
    SINK.store(Some(Arc::new(SinkSlot(sink))));
    ensure_hook();
}

/// Install the std panic hook exactly once per process.
///
/// Called by [`install`] and by guard construction: even without an uncaught
/// sink, the hook is the only point that still sees the failing frames of a
/// panic a guard goes on to contain, so it captures the panic-site backtrace
/// there. With an empty slot it records nothing and delegates to the
/// previously active hook.
pub(crate) fn ensure_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        // A second set in the same process is unreachable inside call_once.
        let _ = PREVIOUS.set(previous);
        panic::set_hook(Box::new(terminal_hook));
    });
}

/// Empty the sink slot. The hook stays installed and becomes a passthrough
/// to the previously active hook.
pub fn reset() {
    SINK.store(None);
}

/// True if a sink is currently installed.
pub fn is_installed() -> bool {
    SINK.load().is_some()
}

fn terminal_hook(info: &PanicHookInfo<'_>) {
    // A panic raised while delivering a record is a logging failure;
    // it stays silent by contract.
    if guard::in_report() {
        return;
    }

    let message = message_of(info.payload());
    let kind = classify(message);

    // A guard on this thread is about to contain this panic and will report
    // it itself; the terminal handler only owns what escapes containment.
    // Capture the failing frames for that guard now — after the unwind is
    // caught they no longer exist.
    if guard::scope_will_contain(kind) {
        guard::stash_panic_site(Backtrace::force_capture().to_string());
        return;
    }

    if let Some(slot) = SINK.load_full() {
        let thread = std::thread::current();
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "<unknown>".to_string());
        let record = FailureRecord::new(
            format!("{}@{}", thread.name().unwrap_or("<unnamed>"), location),
            FailureKind::Uncaught,
            message.unwrap_or("<no panic message>"),
            Backtrace::force_capture().to_string(),
        );
        slot.0.record(&record);
    }

    if let Some(previous) = PREVIOUS.get() {
        previous(info);
    }
}
