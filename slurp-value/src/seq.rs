// slurp-value - Sequence and indexed-vector capabilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence capabilities consumed by the analyzer and evaluator.
//!
//! [`Seq`] is the uniform view used for call forms, `do` bodies and
//! parameter lists. [`Indexed`] adds positional access and is what vector
//! literals are evaluated through. Both are implemented over `im::Vector`,
//! which provides the structural sharing.

use std::fmt;

use crate::value::Value;

/// Persistent vector of values.
pub type Vector = im::Vector<Value>;

/// A sequence view: count, first, rest and conj.
pub trait Seq: Sized {
    fn count(&self) -> usize;

    fn first(&self) -> Option<Value>;

    /// Everything after the first element; empty when there is none.
    fn rest(&self) -> Self;

    /// Add items at the collection's natural insertion point.
    fn conj<I: IntoIterator<Item = Value>>(&self, items: I) -> Self;
}

/// Positional access on top of [`Seq`].
pub trait Indexed: Seq {
    fn entry_at(&self, index: usize) -> Option<Value>;

    /// Replace the entry at `index`, or append when `index == count()`.
    /// `None` when `index` is past the end.
    fn assoc(&self, index: usize, value: Value) -> Option<Self>;

    /// Drop the last entry. `None` on an empty vector.
    fn pop(&self) -> Option<Self>;
}

// ============================================================================
// List
// ============================================================================

/// An immutable list. `conj` prepends, matching call-form construction.
#[derive(Clone, Default, PartialEq)]
pub struct List(im::Vector<Value>);

impl List {
    pub fn new() -> Self {
        List(im::Vector::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> im::vector::Iter<'_, Value> {
        self.0.iter()
    }

    /// A new list with `value` at the head.
    #[must_use]
    pub fn cons(&self, value: Value) -> List {
        let mut items = self.0.clone();
        items.push_front(value);
        List(items)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.iter().cloned().collect()
    }
}

impl Seq for List {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn first(&self) -> Option<Value> {
        self.0.front().cloned()
    }

    fn rest(&self) -> Self {
        if self.0.is_empty() {
            List::new()
        } else {
            List(self.0.skip(1))
        }
    }

    fn conj<I: IntoIterator<Item = Value>>(&self, items: I) -> Self {
        let mut list = self.0.clone();
        for item in items {
            list.push_front(item);
        }
        List(list)
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List(iter.into_iter().collect())
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List(items.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = im::vector::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

// ============================================================================
// Vector
// ============================================================================

impl Seq for Vector {
    fn count(&self) -> usize {
        self.len()
    }

    fn first(&self) -> Option<Value> {
        self.front().cloned()
    }

    fn rest(&self) -> Self {
        if self.is_empty() {
            Vector::new()
        } else {
            self.skip(1)
        }
    }

    fn conj<I: IntoIterator<Item = Value>>(&self, items: I) -> Self {
        let mut vector = self.clone();
        vector.extend(items);
        vector
    }
}

impl Indexed for Vector {
    fn entry_at(&self, index: usize) -> Option<Value> {
        self.get(index).cloned()
    }

    fn assoc(&self, index: usize, value: Value) -> Option<Self> {
        match index.cmp(&self.len()) {
            std::cmp::Ordering::Less => Some(self.update(index, value)),
            std::cmp::Ordering::Equal => {
                let mut vector = self.clone();
                vector.push_back(value);
                Some(vector)
            }
            std::cmp::Ordering::Greater => None,
        }
    }

    fn pop(&self) -> Option<Self> {
        if self.is_empty() {
            return None;
        }
        let mut vector = self.clone();
        vector.pop_back();
        Some(vector)
    }
}
