//! Pure operations over dotted module names (`foo.bar.baz`), independent of any graph.

/// The topmost ancestor of `name` — its leftmost dotted segment.
pub fn root(name: &str) -> &str {
    match name.split_once('.') {
        Some((root, _)) => root,
        None => name,
    }
}

/// The immediate parent of `name`, or `None` if `name` is a root module.
pub fn parent(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(base, _)| base)
}

/// True iff `a`'s parent is exactly `b`.
pub fn is_child_of(a: &str, b: &str) -> bool {
    parent(a) == Some(b)
}

/// True iff `a` is `b` or a descendant of `b`.
pub fn is_descendant_of(a: &str, b: &str) -> bool {
    a == b || a.starts_with(&format!("{b}."))
}

/// True iff `a` strictly descends `b` (excludes `a == b`).
pub fn is_strict_descendant_of(a: &str, b: &str) -> bool {
    a != b && is_descendant_of(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        assert_eq!(root("foo"), "foo");
        assert_eq!(root("foo.bar"), "foo");
        assert_eq!(root("foo.bar.baz"), "foo");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("foo"), None);
        assert_eq!(parent("foo.bar"), Some("foo"));
        assert_eq!(parent("foo.bar.baz"), Some("foo.bar"));
    }

    #[test]
    fn test_is_child_of() {
        assert!(is_child_of("foo.bar", "foo"));
        assert!(!is_child_of("foo.bar.baz", "foo"));
        assert!(!is_child_of("foo", "foo"));
    }

    #[test]
    fn test_is_descendant_of() {
        assert!(is_descendant_of("foo", "foo"));
        assert!(is_descendant_of("foo.bar", "foo"));
        assert!(is_descendant_of("foo.bar.baz", "foo"));
        assert!(!is_descendant_of("foobar", "foo"));
        assert!(!is_descendant_of("foo", "foo.bar"));
    }

    #[test]
    fn test_is_strict_descendant_of() {
        assert!(!is_strict_descendant_of("foo", "foo"));
        assert!(is_strict_descendant_of("foo.bar", "foo"));
    }
}
