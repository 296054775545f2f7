//! Failure classification tags and the record handed to the sink.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a caught failure.
///
/// A closed set of programmer-error panic categories, mirroring the panic
/// messages the standard library produces. `NoneUnwrap` is the canonical
/// category; the rest exist so that enabling them is a configuration change
/// (`[catch] enabled = [...]`), not a code edit. `Uncaught` is reserved for
/// the terminal hook and can never be placed in a catch-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// `Option::unwrap`/`expect` on `None` — the null-reference analog.
    NoneUnwrap,
    /// `Result::unwrap`/`expect` on `Err`.
    ErrUnwrap,
    /// Slice, string, or range indexing out of bounds.
    IndexOutOfRange,
    /// Map indexing with a missing key.
    KeyMissing,
    /// Integer division or remainder by zero.
    DivideByZero,
    /// Checked-arithmetic overflow panics (debug builds).
    ArithmeticOverflow,
    /// Collection capacity overflow.
    CapacityOverflow,
    /// `RefCell` borrow conflicts.
    BorrowViolation,
    /// `assert!`/`assert_eq!`/`assert_ne!` failures.
    AssertionFailed,
    /// An explicit `panic!` with a message that matches no known category.
    ExplicitPanic,
    /// Panic payload carried no recognizable message at all.
    Unknown,
    /// A failure that escaped all containment. Produced only by the terminal
    /// hook; rejected in catch-sets.
    Uncaught,
}

impl FailureKind {
    /// Stable lowercase tag for logs and config, e.g. `"none-unwrap"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoneUnwrap => "none-unwrap",
            Self::ErrUnwrap => "err-unwrap",
            Self::IndexOutOfRange => "index-out-of-range",
            Self::KeyMissing => "key-missing",
            Self::DivideByZero => "divide-by-zero",
            Self::ArithmeticOverflow => "arithmetic-overflow",
            Self::CapacityOverflow => "capacity-overflow",
            Self::BorrowViolation => "borrow-violation",
            Self::AssertionFailed => "assertion-failed",
            Self::ExplicitPanic => "explicit-panic",
            Self::Unknown => "unknown",
            Self::Uncaught => "uncaught",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FailureKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none-unwrap" => Ok(Self::NoneUnwrap),
            "err-unwrap" => Ok(Self::ErrUnwrap),
            "index-out-of-range" => Ok(Self::IndexOutOfRange),
            "key-missing" => Ok(Self::KeyMissing),
            "divide-by-zero" => Ok(Self::DivideByZero),
            "arithmetic-overflow" => Ok(Self::ArithmeticOverflow),
            "capacity-overflow" => Ok(Self::CapacityOverflow),
            "borrow-violation" => Ok(Self::BorrowViolation),
            "assertion-failed" => Ok(Self::AssertionFailed),
            "explicit-panic" => Ok(Self::ExplicitPanic),
            "unknown" => Ok(Self::Unknown),
            "uncaught" => Ok(Self::Uncaught),
            _ => Err(()),
        }
    }
}

/// One caught failure, as delivered to the sink.
///
/// Built at the moment of catch, handed to the sink exactly once, then
/// dropped. Nothing in the layer retains records.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Source identifier: the boundary tag for contained failures, or
    /// `thread@file:line` for uncaught ones.
    pub boundary: String,
    pub kind: FailureKind,
    /// Human-readable panic message.
    pub message: String,
    /// Formatted backtrace, possibly empty when capture is disabled.
    pub backtrace: String,
}

impl FailureRecord {
    pub fn new(
        boundary: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
        backtrace: impl Into<String>,
    ) -> Self {
        Self {
            boundary: boundary.into(),
            kind,
            message: message.into(),
            backtrace: backtrace.into(),
        }
    }
}
