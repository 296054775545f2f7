//! Call boundary descriptions: the static unit of work a guard wraps.

/// What kind of unit of work a boundary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// An ordinary method or free function.
    Method,
    /// A constructor (`new`, builder finishers, and the like).
    Constructor,
    /// The process- or thread-top entry point. Never selected for wrapping;
    /// handled exclusively by the terminal hook.
    EntryPoint,
}

/// Static description of one call boundary.
///
/// Constructed once (typically as a `static` or at composition time from the
/// enclosing module path) and never mutated. Selection reads only this
/// description, so the wrap set is auditable up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBoundary {
    /// Dot-separated hierarchical name of the enclosing module/type,
    /// e.g. `"app.widget"`.
    pub namespace: String,
    /// Name of the operation at this boundary, e.g. `"render"`.
    pub name: String,
    pub kind: BoundaryKind,
    /// True if this boundary belongs to the containment layer itself.
    /// Internal boundaries are never wrapped, regardless of policy —
    /// the layer must not intercept its own failures and recurse.
    pub internal: bool,
}

impl CallBoundary {
    /// A method boundary.
    pub fn method(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind: BoundaryKind::Method,
            internal: false,
        }
    }

    /// A constructor boundary.
    pub fn constructor(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind: BoundaryKind::Constructor,
            internal: false,
        }
    }

    /// The top-level entry-point boundary.
    pub fn entry_point(name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
            kind: BoundaryKind::EntryPoint,
            internal: false,
        }
    }

    /// Mark this boundary as belonging to the containment layer itself.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Source identifier handed to the failure sink, `"namespace.name"`.
    pub fn tag(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// Segment-aligned prefix test over dot-separated namespaces.
///
/// `"app"` covers `"app"` and `"app.widget"`, but not `"applet"`.
pub fn namespace_within(namespace: &str, prefix: &str) -> bool {
    namespace == prefix
        || (namespace.len() > prefix.len()
            && namespace.starts_with(prefix)
            && namespace.as_bytes()[prefix.len()] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_whole_segments_only() {
        assert!(namespace_within("app", "app"));
        assert!(namespace_within("app.widget", "app"));
        assert!(namespace_within("app.widget.button", "app.widget"));
        assert!(!namespace_within("applet", "app"));
        assert!(!namespace_within("app", "app.widget"));
        assert!(!namespace_within("xapp.widget", "app"));
    }

    #[test]
    fn tag_joins_namespace_and_name() {
        assert_eq!(CallBoundary::method("app.widget", "render").tag(), "app.widget.render");
        assert_eq!(CallBoundary::entry_point("main").tag(), "main");
    }
}
