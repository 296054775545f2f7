//! Panic payload classification.
//!
//! The standard library panics with stable, documented message shapes for
//! each programmer-error category. Classification is a pure match over those
//! shapes, so the catch-set stays data-driven: the guard compares the
//! resulting [`FailureKind`] against the policy instead of branching per
//! category in code.

use std::any::Any;

use crate::failure::FailureKind;

/// Extract the human-readable message from a panic payload, if it carries one.
///
/// Panics raised via `panic!` and by the standard library carry `&str` or
/// `String`; anything else (custom `panic_any` payloads) yields `None`.
pub fn message_of(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some(s)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}

/// Classify a panic message into a [`FailureKind`].
///
/// Messages that match no known standard-library shape classify as
/// `ExplicitPanic`; a missing message classifies as `Unknown`. Both are
/// rethrown under the default policy.
pub fn classify(message: Option<&str>) -> FailureKind {
    let Some(msg) = message else {
        return FailureKind::Unknown;
    };

    if msg == "called `Option::unwrap()` on a `None` value" {
        FailureKind::NoneUnwrap
    } else if msg.starts_with("called `Result::unwrap()` on an `Err` value") {
        FailureKind::ErrUnwrap
    } else if msg.starts_with("index out of bounds")
        || msg.starts_with("byte index")
        || msg.starts_with("slice index")
        || msg.contains("out of range for slice")
    {
        FailureKind::IndexOutOfRange
    } else if msg == "no entry found for key" {
        FailureKind::KeyMissing
    } else if msg == "attempt to divide by zero"
        || msg == "attempt to calculate the remainder with a divisor of zero"
    {
        FailureKind::DivideByZero
    } else if msg.starts_with("attempt to") && msg.ends_with("with overflow") {
        FailureKind::ArithmeticOverflow
    } else if msg == "capacity overflow" {
        FailureKind::CapacityOverflow
    } else if msg.ends_with("BorrowError") || msg.ends_with("BorrowMutError") {
        FailureKind::BorrowViolation
    } else if msg.starts_with("assertion failed") || msg.starts_with("assertion `") {
        FailureKind::AssertionFailed
    } else {
        FailureKind::ExplicitPanic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_std_messages() {
        let cases = [
            ("called `Option::unwrap()` on a `None` value", FailureKind::NoneUnwrap),
            (
                "called `Result::unwrap()` on an `Err` value: ParseIntError { kind: InvalidDigit }",
                FailureKind::ErrUnwrap,
            ),
            ("index out of bounds: the len is 3 but the index is 7", FailureKind::IndexOutOfRange),
            ("byte index 4 is not a char boundary", FailureKind::IndexOutOfRange),
            ("range end index 5 out of range for slice of length 3", FailureKind::IndexOutOfRange),
            ("no entry found for key", FailureKind::KeyMissing),
            ("attempt to divide by zero", FailureKind::DivideByZero),
            ("attempt to add with overflow", FailureKind::ArithmeticOverflow),
            ("attempt to shift left with overflow", FailureKind::ArithmeticOverflow),
            ("capacity overflow", FailureKind::CapacityOverflow),
            ("already mutably borrowed: BorrowError", FailureKind::BorrowViolation),
            ("already borrowed: BorrowMutError", FailureKind::BorrowViolation),
            ("assertion failed: x > 0", FailureKind::AssertionFailed),
            ("assertion `left == right` failed\n  left: 1\n right: 2", FailureKind::AssertionFailed),
            ("something exploded", FailureKind::ExplicitPanic),
        ];
        for (msg, expected) in cases {
            assert_eq!(classify(Some(msg)), expected, "message: {msg:?}");
        }
    }

    #[test]
    fn missing_message_is_unknown() {
        assert_eq!(classify(None), FailureKind::Unknown);
    }

    #[test]
    fn extracts_str_and_string_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(message_of(s.as_ref()), Some("static message"));

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(message_of(owned.as_ref()), Some("owned message"));

        let opaque: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(message_of(opaque.as_ref()), None);
    }
}
