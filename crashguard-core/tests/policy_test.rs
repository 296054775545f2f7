//! Tests for boundary selection.

use crashguard_core::boundary::CallBoundary;
use crashguard_core::failure::FailureKind;
use crashguard_core::policy::SelectionPolicy;

fn policy(include: &[&str], exclude: &[&str]) -> SelectionPolicy {
    SelectionPolicy::with_default_catch_set(
        include.iter().map(|s| s.to_string()).collect(),
        exclude.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

/// CG-POL-01: Methods and constructors under an include prefix are selected.
#[test]
fn test_include_prefix_selects_methods_and_constructors() {
    let policy = policy(&["app"], &[]);

    assert!(policy.selects(&CallBoundary::method("app.widget", "render")));
    assert!(policy.selects(&CallBoundary::constructor("app.widget", "new")));
    assert!(policy.selects(&CallBoundary::method("app", "run")));
}

/// CG-POL-02: Exclude prefixes carve out of the include set.
#[test]
fn test_exclude_wins_over_include() {
    let policy = policy(&["app"], &["app.aspect"]);

    assert!(policy.selects(&CallBoundary::method("app.widget", "render")));
    assert!(!policy.selects(&CallBoundary::method("app.aspect", "internal")));
    assert!(!policy.selects(&CallBoundary::method("app.aspect.inner", "helper")));
}

/// CG-POL-03: Prefix matching is segment-aligned, not raw string prefix.
#[test]
fn test_segment_aligned_matching() {
    let policy = policy(&["app"], &[]);

    assert!(!policy.selects(&CallBoundary::method("applet", "run")));
    assert!(!policy.selects(&CallBoundary::method("xapp", "run")));
}

/// CG-POL-04: Namespaces outside every include prefix are not selected.
#[test]
fn test_outside_include_not_selected() {
    let policy = policy(&["app"], &[]);

    assert!(!policy.selects(&CallBoundary::method("vendor.widget", "render")));
}

/// CG-POL-05: Entry points are never selected; they belong to the terminal
/// handler, not per-call wrapping.
#[test]
fn test_entry_point_never_selected() {
    let policy = policy(&["app"], &[]);

    let mut main = CallBoundary::entry_point("main");
    assert!(!policy.selects(&main));

    // Even with a namespace squarely inside the include set.
    main.namespace = "app".to_string();
    assert!(!policy.selects(&main));
}

/// CG-POL-06: Internal boundaries are excluded regardless of policy — the
/// layer must never wrap itself.
#[test]
fn test_internal_boundary_hard_exclusion() {
    let policy = policy(&["app"], &[]);

    let internal = CallBoundary::method("app.widget", "render").internal();
    assert!(!policy.selects(&internal));
}

/// CG-POL-07: Selection is deterministic: same boundary, same verdict.
#[test]
fn test_selection_is_deterministic() {
    let policy = policy(&["app"], &["app.aspect"]);
    let boundary = CallBoundary::method("app.widget", "render");

    let first = policy.selects(&boundary);
    for _ in 0..100 {
        assert_eq!(policy.selects(&boundary), first);
    }
}

/// CG-POL-08: The catch-set is independent of selection and defaults to
/// none-unwrap only.
#[test]
fn test_default_catch_set_is_minimal() {
    let policy = policy(&["app"], &[]);

    assert!(policy.catches(FailureKind::NoneUnwrap));
    assert!(!policy.catches(FailureKind::ErrUnwrap));
    assert!(!policy.catches(FailureKind::IndexOutOfRange));
    assert!(!policy.catches(FailureKind::ExplicitPanic));
    assert!(!policy.catches(FailureKind::Uncaught));
}

/// CG-POL-09: An empty include set selects nothing.
#[test]
fn test_empty_include_selects_nothing() {
    let policy = policy(&[], &[]);

    assert!(!policy.selects(&CallBoundary::method("app.widget", "render")));
}
