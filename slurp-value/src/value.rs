// slurp-value - Value types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type.
//!
//! [`Value`] is both the form handed to the analyzer and the result of
//! evaluation. Every variant is `Send + Sync` so values can live in the
//! shared root environment and cross into spawned evaluations.

use std::fmt;
use std::sync::Arc;

use crate::func::{FnValue, HostValue, NativeFn};
use crate::keyword::Keyword;
use crate::seq::{List, Vector};
use crate::symbol::Symbol;

/// A dynamically-typed value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(Arc<str>),
    Symbol(Symbol),
    Keyword(Keyword),
    /// Call forms and quoted lists
    List(List),
    /// Persistent vector
    Vector(Vector),
    /// User-defined function or macro
    Fn(FnValue),
    /// Host function
    NativeFn(NativeFn),
    /// Opaque host value
    Host(HostValue),
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    pub fn string(s: &str) -> Self {
        Value::String(Arc::from(s))
    }

    /// A relative or qualified symbol parsed from `s`.
    pub fn symbol(s: &str) -> Self {
        Value::Symbol(Symbol::parse(s))
    }

    pub fn keyword(s: &str) -> Self {
        Value::Keyword(Keyword::parse(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(List::from(items))
    }

    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    pub fn host<T: std::any::Any + Send + Sync>(value: T) -> Self {
        Value::Host(HostValue::new(value))
    }
}

// ============================================================================
// Predicates & accessors
// ============================================================================

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// True for values that can stand in call position.
    pub fn is_invokable(&self) -> bool {
        matches!(self, Value::Fn(_) | Value::NativeFn(_))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&FnValue> {
        match self {
            Value::Fn(f) => Some(f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Fn(f) if f.is_macro() => "macro",
            Value::Fn(_) => "fn",
            Value::NativeFn(_) => "native-fn",
            Value::Host(h) => h.type_name(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<Keyword> for Value {
    fn from(kw: Keyword) -> Self {
        Value::Keyword(kw)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

// ============================================================================
// Equality
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Fn(a), Value::Fn(b)) => a.ptr_eq(b),
            (Value::NativeFn(a), Value::NativeFn(b)) => a.ptr_eq(b),
            (Value::Host(a), Value::Host(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ============================================================================
// Printing
// ============================================================================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.is_nan() {
                    write!(f, "##NaN")
                } else if n.is_infinite() {
                    write!(f, "{}", if *n > 0.0 { "##Inf" } else { "##-Inf" })
                } else if n.fract() == 0.0 {
                    write!(f, "{}.0", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Char(c) => write!(f, "\\{}", format_char(*c)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Keyword(kw) => write!(f, "{}", kw),
            Value::List(items) => write_seq(f, "(", items.iter(), ")"),
            Value::Vector(items) => write_seq(f, "[", items.iter(), "]"),
            Value::Fn(func) => write!(f, "{}", func),
            Value::NativeFn(nf) => write!(f, "{:?}", nf),
            Value::Host(host) => write!(f, "{:?}", host),
        }
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

fn format_char(c: char) -> String {
    match c {
        '\n' => "newline".to_string(),
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\r' => "return".to_string(),
        _ => c.to_string(),
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}
