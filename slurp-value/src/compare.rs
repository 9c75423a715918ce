// slurp-value - Equality and ordering helpers
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Ordering across values.
//!
//! Numbers order within their own type, strings and characters order
//! lexically, booleans order `false < true`. Any other pair is only
//! comparable when the two values are equal.

use std::cmp::Ordering;

use crate::value::Value;

/// Two values have no defined ordering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot compare {left} with {right}")]
pub struct Incomparable {
    pub left: &'static str,
    pub right: &'static str,
}

impl Incomparable {
    fn between(a: &Value, b: &Value) -> Self {
        Incomparable {
            left: a.type_name(),
            right: b.type_name(),
        }
    }
}

/// Order two values.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, Incomparable> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => {
            x.partial_cmp(y).ok_or_else(|| Incomparable::between(a, b))
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        _ if a == b => Ok(Ordering::Equal),
        _ => Err(Incomparable::between(a, b)),
    }
}

/// Structural equality; never fails.
pub fn eq(a: &Value, b: &Value) -> bool {
    a == b
}
