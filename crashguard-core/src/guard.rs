//! The interceptor: wraps selected call boundaries and contains panics.
//!
//! A [`Guard`] executes synchronously on the calling thread and adds nothing
//! to the success path beyond one selection check. On a panic it classifies
//! the payload, and either records-and-suppresses (kind in the catch-set) or
//! rethrows unchanged (kind not owned by this policy).
//!
//! Suppression returns `None`. That is the whole deal callers sign up for:
//! code downstream of a wrapped boundary must tolerate an absent result where
//! it previously could assume a panic would have stopped execution. The
//! `Option` return makes that obligation explicit at the call site instead of
//! smuggling a null through a non-optional type.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::boundary::CallBoundary;
use crate::classify::{classify, message_of};
use crate::failure::{FailureKind, FailureRecord};
use crate::policy::SelectionPolicy;
use crate::sink::FailureSink;

thread_local! {
    /// Stack of policies for containment regions currently live on this
    /// thread. The terminal hook consults it to tell panics that are about to
    /// be contained apart from panics that will escape.
    static SCOPES: RefCell<Vec<Arc<SelectionPolicy>>> = const { RefCell::new(Vec::new()) };
}

thread_local! {
    /// Set while a record is being delivered to a sink. Panics raised in that
    /// window are logging failures and must stay silent.
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

thread_local! {
    /// Backtrace captured by the panic hook at the panic site, for the guard
    /// that is about to contain the unwind. By the time `catch_unwind`
    /// returns, the failing frames are gone; the hook is the only point that
    /// still sees them.
    static PANIC_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Stash the panic-site backtrace for the containing guard on this thread.
pub(crate) fn stash_panic_site(backtrace: String) {
    PANIC_SITE.with(|site| *site.borrow_mut() = Some(backtrace));
}

fn take_panic_site() -> Option<String> {
    PANIC_SITE.with(|site| site.borrow_mut().take())
}

/// True if any containment scope on the current thread catches `kind`.
pub(crate) fn scope_will_contain(kind: FailureKind) -> bool {
    SCOPES.with(|scopes| scopes.borrow().iter().any(|policy| policy.catches(kind)))
}

/// True while the current thread is inside sink delivery.
pub(crate) fn in_report() -> bool {
    REPORTING.with(Cell::get)
}

/// RAII frame marking one containment region; pops on every exit path,
/// including unwinds out of `resume_unwind`.
struct ContainmentScope;

impl ContainmentScope {
    fn enter(policy: Arc<SelectionPolicy>) -> Self {
        SCOPES.with(|scopes| scopes.borrow_mut().push(policy));
        Self
    }
}

impl Drop for ContainmentScope {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}

/// Wrapper applied at selected call boundaries.
///
/// Cheap to clone (two `Arc`s) and stateless across invocations: concurrent
/// calls through the same guard share nothing but the sink.
#[derive(Clone)]
pub struct Guard {
    policy: Arc<SelectionPolicy>,
    sink: Arc<dyn FailureSink>,
}

impl Guard {
    /// Build a guard over `policy` reporting to `sink`.
    ///
    /// Also makes sure the process panic hook is in place: the hook captures
    /// the panic-site backtrace for contained failures, which the guard can
    /// no longer see once the unwind has been caught.
    pub fn new(policy: Arc<SelectionPolicy>, sink: Arc<dyn FailureSink>) -> Self {
        crate::terminal::ensure_hook();
        Self { policy, sink }
    }

    /// The policy this guard selects and classifies with.
    pub fn policy(&self) -> &Arc<SelectionPolicy> {
        &self.policy
    }

    /// Invoke `op` at `boundary`, containing catch-set panics.
    ///
    /// - Boundary not selected (out of scope, entry point, or internal):
    ///   `op` runs directly; behavior is identical to the unwrapped call,
    ///   panics included.
    /// - Selected, `op` succeeds: returns `Some(value)`, nothing recorded.
    /// - Selected, `op` panics with a kind in the catch-set: one record goes
    ///   to the sink and the caller receives `None`.
    /// - Selected, `op` panics with any other kind: the panic is rethrown
    ///   unchanged and propagates past this guard.
    ///
    /// `op` is run under `AssertUnwindSafe`: a contained boundary may leave
    /// shared state mid-update, exactly as a caught exception would. No
    /// repair is attempted; that risk sits with whoever widens the catch-set.
    pub fn call<R>(&self, boundary: &CallBoundary, op: impl FnOnce() -> R) -> Option<R> {
        if !self.policy.selects(boundary) {
            return Some(op());
        }
        self.contained_call(boundary, op)
    }

    /// Like [`Guard::call`] but collapses suppression into `R::default()`.
    pub fn call_or_default<R: Default>(
        &self,
        boundary: &CallBoundary,
        op: impl FnOnce() -> R,
    ) -> R {
        self.call(boundary, op).unwrap_or_default()
    }

    /// Composition-time wrapping: evaluate selection once, up front, and
    /// return a reusable wrapped handle.
    ///
    /// The selection verdict is frozen at bind time, which makes the wrap set
    /// enumerable before any call happens. Containment behavior per
    /// invocation is the same as [`Guard::call`].
    pub fn bind<R>(
        &self,
        boundary: CallBoundary,
        f: impl Fn() -> R,
    ) -> impl Fn() -> Option<R> {
        let selected = self.policy.selects(&boundary);
        let guard = self.clone();
        move || {
            if selected {
                guard.contained_call(&boundary, &f)
            } else {
                Some(f())
            }
        }
    }

    /// Containment path for an already-selected boundary.
    fn contained_call<R>(&self, boundary: &CallBoundary, op: impl FnOnce() -> R) -> Option<R> {
        let _scope = ContainmentScope::enter(self.policy.clone());
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(value) => Some(value),
            Err(payload) => {
                let kind = classify(message_of(payload.as_ref()));
                if self.policy.catches(kind) {
                    self.report(boundary, kind, message_of(payload.as_ref()));
                    None
                } else {
                    // Not ours: propagate as if this guard did not exist.
                    resume_unwind(payload)
                }
            }
        }
    }

    /// Build and deliver one record. Sink panics are swallowed here; a
    /// failure while logging a failure must never reach the caller.
    ///
    /// The backtrace comes from the hook's panic-site stash, so it shows the
    /// frames that raised the failure. The catch-site fallback only applies
    /// when the hook never saw the panic (a payload rethrown into this scope
    /// from a caller's own `catch_unwind`).
    fn report(&self, boundary: &CallBoundary, kind: FailureKind, message: Option<&str>) {
        let backtrace = take_panic_site()
            .unwrap_or_else(|| Backtrace::force_capture().to_string());
        let record = FailureRecord::new(
            boundary.tag(),
            kind,
            message.unwrap_or("<no panic message>"),
            backtrace,
        );
        tracing::debug!(
            target: "crashguard",
            boundary = %record.boundary,
            kind = %kind,
            "suppressing contained failure"
        );
        let sink = &self.sink;
        REPORTING.with(|flag| flag.set(true));
        let _ = catch_unwind(AssertUnwindSafe(|| sink.record(&record)));
        REPORTING.with(|flag| flag.set(false));
    }
}
