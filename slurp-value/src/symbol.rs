// slurp-value - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers that may be optionally namespaced.
//!
//! A *relative* symbol carries no namespace and is resolved against the
//! currently active namespace. A *fully-qualified* symbol names its
//! namespace explicitly and that namespace is never re-derived.
//!
//! Symbols are interned (see the `name` module), so clones are cheap and
//! equality is a pointer comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::name::{self, QualifiedName, Table};

/// A symbol with optional namespace.
#[derive(Clone)]
pub struct Symbol {
    inner: Arc<QualifiedName>,
}

impl Symbol {
    /// Create a relative symbol.
    pub fn new(name: &str) -> Self {
        Symbol {
            inner: name::intern(Table::Symbols, None, name),
        }
    }

    /// Create a fully-qualified symbol.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Symbol {
            inner: name::intern(Table::Symbols, Some(namespace), name),
        }
    }

    /// Parse a symbol from a string like "foo" or "ns/foo".
    pub fn parse(s: &str) -> Self {
        match name::split_qualified(s) {
            (Some(ns), name) => Symbol::with_namespace(ns, name),
            (None, name) => Symbol::new(name),
        }
    }

    /// Get the namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace()
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// True if the symbol carries an explicit namespace.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.inner.namespace().is_some()
    }

    /// A symbol is valid when its name is not blank.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name().trim().is_empty()
    }

    /// The same name with the namespace dropped.
    #[must_use]
    pub fn relative(&self) -> Symbol {
        if self.is_qualified() {
            Symbol::new(self.name())
        } else {
            self.clone()
        }
    }

    /// The same name placed in `namespace`.
    #[must_use]
    pub fn qualify(&self, namespace: &str) -> Symbol {
        Symbol::with_namespace(namespace, self.name())
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return std::cmp::Ordering::Equal;
        }
        (self.namespace(), self.name()).cmp(&(other.namespace(), other.name()))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, "{}/{}", ns, self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_new() {
        let sym = Symbol::new("foo");
        assert_eq!(sym.name(), "foo");
        assert_eq!(sym.namespace(), None);
        assert!(!sym.is_qualified());
    }

    #[test]
    fn test_symbol_parse_qualified() {
        let sym = Symbol::parse("my.ns/foo");
        assert_eq!(sym.namespace(), Some("my.ns"));
        assert_eq!(sym.name(), "foo");
        assert_eq!(sym.to_string(), "my.ns/foo");
    }

    #[test]
    fn test_symbol_parse_slash() {
        let sym = Symbol::parse("/");
        assert_eq!(sym.name(), "/");
        assert!(!sym.is_qualified());
    }

    #[test]
    fn test_symbol_interning() {
        assert_eq!(Symbol::new("a"), Symbol::new("a"));
        assert_ne!(Symbol::new("a"), Symbol::with_namespace("user", "a"));
    }

    #[test]
    fn test_symbol_validity() {
        assert!(Symbol::new("x").is_valid());
        assert!(!Symbol::new("").is_valid());
        assert!(!Symbol::new("  \t").is_valid());
    }

    #[test]
    fn test_relative_and_qualify() {
        let sym = Symbol::with_namespace("core", "map");
        assert_eq!(sym.relative(), Symbol::new("map"));
        assert_eq!(Symbol::new("map").qualify("core"), sym);
    }

    #[test]
    fn test_symbol_ordering() {
        let mut syms = vec![Symbol::new("b"), Symbol::parse("z/a"), Symbol::new("a")];
        syms.sort();
        assert_eq!(
            syms,
            vec![Symbol::new("a"), Symbol::new("b"), Symbol::parse("z/a")]
        );
    }
}
