// slurp-value - Interned qualified names
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared interner backing [`Symbol`](crate::Symbol) and
//! [`Keyword`](crate::Keyword).
//!
//! A qualified name is an optional namespace plus a name. Interned names
//! are never deallocated; equal names share one allocation, so equality
//! and hashing on the wrapping types are pointer operations.
//!
//! The interner sits behind a `Mutex`. Only construction takes the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[derive(Debug)]
pub(crate) struct QualifiedName {
    namespace: Option<Arc<str>>,
    name: Arc<str>,
}

impl QualifiedName {
    pub(crate) fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

type Key = (Option<Arc<str>>, Arc<str>);

#[derive(Default)]
struct Interner {
    names: HashMap<Key, Arc<QualifiedName>>,
    strings: HashMap<Box<str>, Arc<str>>,
}

impl Interner {
    fn string(&mut self, s: &str) -> Arc<str> {
        if let Some(interned) = self.strings.get(s) {
            return Arc::clone(interned);
        }
        let interned: Arc<str> = Arc::from(s);
        self.strings.insert(Box::from(s), Arc::clone(&interned));
        interned
    }

    fn intern(&mut self, namespace: Option<&str>, name: &str) -> Arc<QualifiedName> {
        let namespace = namespace.map(|ns| self.string(ns));
        let name = self.string(name);
        let key = (namespace.clone(), name.clone());
        Arc::clone(
            self.names
                .entry(key)
                .or_insert_with(|| Arc::new(QualifiedName { namespace, name })),
        )
    }
}

static SYMBOLS: OnceLock<Mutex<Interner>> = OnceLock::new();
static KEYWORDS: OnceLock<Mutex<Interner>> = OnceLock::new();

/// Which table a name is interned in. Symbols and keywords never share
/// storage, so a symbol and a keyword with the same text stay distinct
/// allocations.
#[derive(Clone, Copy)]
pub(crate) enum Table {
    Symbols,
    Keywords,
}

pub(crate) fn intern(table: Table, namespace: Option<&str>, name: &str) -> Arc<QualifiedName> {
    let cell = match table {
        Table::Symbols => &SYMBOLS,
        Table::Keywords => &KEYWORDS,
    };
    // The tables only ever grow; a panic mid-insert leaves them usable.
    cell.get_or_init(|| Mutex::new(Interner::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .intern(namespace, name)
}

/// Split `ns/name` on the first slash. A lone `/`, or a slash in leading
/// or trailing position, yields no namespace.
pub(crate) fn split_qualified(s: &str) -> (Option<&str>, &str) {
    match s.find('/') {
        Some(pos) if pos > 0 && pos + 1 < s.len() => (Some(&s[..pos]), &s[pos + 1..]),
        _ => (None, s),
    }
}
