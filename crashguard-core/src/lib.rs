//! Failure containment for call boundaries.
//!
//! crashguard interposes on selected method and constructor boundaries so
//! that programmer-error panics are intercepted, classified, recorded, and
//! suppressed instead of unwinding up and killing the process. Three pieces
//! cooperate:
//!
//! - [`SelectionPolicy`] decides, from the static [`CallBoundary`]
//!   description alone, whether a boundary is in scope (include prefixes,
//!   minus exclude prefixes, never the layer's own code).
//! - [`Guard`] wraps execution at selected boundaries: panics whose
//!   [`FailureKind`] is in the configured catch-set are logged through a
//!   [`FailureSink`] and collapsed to `None`; every other panic is rethrown
//!   unchanged.
//! - [`terminal`] registers the one process-wide hook that records panics
//!   escaping all containment, then lets the default fatal behavior proceed.
//!
//! # The trade-off, stated plainly
//!
//! Containment trades correctness for availability. A caller that receives
//! `None` from a wrapped boundary is running past a bug that would otherwise
//! have stopped the program, possibly with shared state left mid-update.
//! That is why the default catch-set holds a single kind
//! ([`FailureKind::NoneUnwrap`]) and why widening it lives in configuration,
//! where it can be reviewed, rather than in code. Non-unwinding failures
//! (aborts, out-of-memory, stack exhaustion) are never containable.
//!
//! ```
//! use std::sync::Arc;
//! use crashguard_core::{CallBoundary, Guard, NoopSink, SelectionPolicy};
//!
//! let policy = Arc::new(SelectionPolicy::with_default_catch_set(
//!     vec!["app".into()],
//!     vec!["app.aspect".into()],
//! )?);
//! let guard = Guard::new(policy, Arc::new(NoopSink));
//!
//! let render = CallBoundary::method("app.widget", "render");
//! let missing: Option<u32> = None;
//! // The unwrap panic is contained; the caller sees a neutral result.
//! assert_eq!(guard.call(&render, || missing.unwrap()), None);
//! # Ok::<(), crashguard_core::errors::PolicyError>(())
//! ```

pub mod boundary;
pub mod classify;
pub mod config;
pub mod errors;
pub mod failure;
pub mod guard;
pub mod policy;
pub mod sink;
pub mod terminal;

pub use boundary::{BoundaryKind, CallBoundary};
pub use config::ContainmentConfig;
pub use failure::{FailureKind, FailureRecord};
pub use guard::Guard;
pub use policy::SelectionPolicy;
pub use sink::{FailureSink, NoopSink, TracingSink};
