// slurp-value - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers that may be optionally namespaced.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::name::{self, QualifiedName, Table};

/// A keyword with optional namespace, displayed as `:ns/name`.
#[derive(Clone)]
pub struct Keyword {
    inner: Arc<QualifiedName>,
}

impl Keyword {
    pub fn new(name: &str) -> Self {
        Keyword {
            inner: name::intern(Table::Keywords, None, name),
        }
    }

    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Keyword {
            inner: name::intern(Table::Keywords, Some(namespace), name),
        }
    }

    /// Parse a keyword from "foo", "ns/foo", or the same with a leading colon.
    pub fn parse(s: &str) -> Self {
        let s = s.strip_prefix(':').unwrap_or(s);
        match name::split_qualified(s) {
            (Some(ns), name) => Keyword::with_namespace(ns, name),
            (None, name) => Keyword::new(name),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.namespace(), self.name()).cmp(&(other.namespace(), other.name()))
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(ns) => write!(f, ":{}/{}", ns, self.name()),
            None => write!(f, ":{}", self.name()),
        }
    }
}
