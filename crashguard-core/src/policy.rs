//! Selection policy: which boundaries are wrapped, which failure kinds are
//! contained.
//!
//! The policy is built once at startup and read-only thereafter. Selection is
//! a pure predicate over the static boundary description, so the wrap set a
//! given policy produces is stable and auditable.

use rustc_hash::FxHashSet;

use crate::boundary::{namespace_within, BoundaryKind, CallBoundary};
use crate::errors::PolicyError;
use crate::failure::FailureKind;

/// Process-wide inclusion/exclusion rules plus the enabled catch-set.
///
/// A boundary is selected iff it is a method or constructor, its namespace
/// falls under at least one include prefix, under no exclude prefix, and it
/// is not internal to the containment layer. Entry points are never selected;
/// they belong to the terminal hook.
///
/// The default catch-set contains only [`FailureKind::NoneUnwrap`]. Blanket
/// suppression of broader categories trades correctness for availability;
/// widening the set is a configuration decision that should be reviewed like
/// one.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    include: Vec<String>,
    exclude: Vec<String>,
    catch_set: FxHashSet<FailureKind>,
}

impl SelectionPolicy {
    /// Build a policy from include/exclude namespace prefixes and a catch-set.
    ///
    /// Prefixes are validated: non-empty, no leading/trailing/doubled dots,
    /// no whitespace. `FailureKind::Uncaught` is rejected in the catch-set.
    pub fn new(
        include: Vec<String>,
        exclude: Vec<String>,
        catch_set: impl IntoIterator<Item = FailureKind>,
    ) -> Result<Self, PolicyError> {
        for prefix in include.iter().chain(exclude.iter()) {
            validate_prefix(prefix)?;
        }

        let catch_set: FxHashSet<FailureKind> = catch_set.into_iter().collect();
        if catch_set.contains(&FailureKind::Uncaught) {
            return Err(PolicyError::ReservedKind {
                kind: FailureKind::Uncaught,
            });
        }

        Ok(Self {
            include,
            exclude,
            catch_set,
        })
    }

    /// Policy covering `include` with the default catch-set (`NoneUnwrap` only).
    pub fn with_default_catch_set(
        include: Vec<String>,
        exclude: Vec<String>,
    ) -> Result<Self, PolicyError> {
        Self::new(include, exclude, [FailureKind::NoneUnwrap])
    }

    /// Pure selection predicate: is this boundary wrapped under this policy?
    pub fn selects(&self, boundary: &CallBoundary) -> bool {
        if boundary.internal {
            // Hard exclusion, independent of the configured prefixes.
            return false;
        }
        match boundary.kind {
            BoundaryKind::Method | BoundaryKind::Constructor => {}
            BoundaryKind::EntryPoint => return false,
        }
        let included = self
            .include
            .iter()
            .any(|p| namespace_within(&boundary.namespace, p));
        let excluded = self
            .exclude
            .iter()
            .any(|p| namespace_within(&boundary.namespace, p));
        included && !excluded
    }

    /// Is this failure kind in the enabled catch-set?
    pub fn catches(&self, kind: FailureKind) -> bool {
        self.catch_set.contains(&kind)
    }

    /// The enabled catch-set, for inspection and audit logging.
    pub fn catch_set(&self) -> impl Iterator<Item = FailureKind> + '_ {
        self.catch_set.iter().copied()
    }
}

fn validate_prefix(prefix: &str) -> Result<(), PolicyError> {
    if prefix.is_empty() {
        return Err(PolicyError::EmptyPrefix);
    }
    if prefix.split('.').any(|segment| segment.is_empty()) {
        return Err(PolicyError::InvalidPrefix {
            prefix: prefix.to_string(),
            message: "empty namespace segment".to_string(),
        });
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(PolicyError::InvalidPrefix {
            prefix: prefix.to_string(),
            message: "whitespace in namespace".to_string(),
        });
    }
    Ok(())
}
