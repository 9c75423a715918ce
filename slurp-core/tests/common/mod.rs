// slurp-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for slurp-core integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`read`] / [`read_all`] - A minimal s-expression reader for test input
//! - [`sym`], [`list`], [`vector`] - Form builders
//! - [`new_interp`] - An interpreter with a few arithmetic and list natives
//! - [`eval_str`] - Evaluate code in a fresh interpreter
//! - [`eval_str_with`] - Evaluate code in an existing interpreter
//! - [`try_eval`] - Like [`eval_str_with`] but keeps the typed error
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value

#![allow(dead_code)]

use std::iter::Peekable;
use std::str::Chars;

pub use slurp_core::{Error, Interpreter, SpawnPolicy, Value};
use slurp_value::compare;

// =============================================================================
// Reader
// =============================================================================

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Reader<'_> {
    fn skip_whitespace(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() || *c == ',' => {
                    self.chars.next();
                }
                Some(';') => {
                    for c in self.chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read(&mut self) -> Option<Value> {
        self.skip_whitespace();
        let c = *self.chars.peek()?;
        match c {
            '(' => {
                self.chars.next();
                Some(Value::list(self.read_until(')')))
            }
            '[' => {
                self.chars.next();
                Some(Value::vector(self.read_until(']')))
            }
            ')' | ']' => panic!("unexpected '{}'", c),
            '\'' => {
                self.chars.next();
                let form = self.read().expect("quote needs a form");
                Some(Value::list(vec![Value::symbol("quote"), form]))
            }
            '"' => {
                self.chars.next();
                Some(self.read_string())
            }
            '\\' => {
                self.chars.next();
                let name = self.read_token();
                let c = match name.as_str() {
                    "newline" => '\n',
                    "space" => ' ',
                    "tab" => '\t',
                    _ => name.chars().next().expect("character literal"),
                };
                Some(Value::Char(c))
            }
            _ => Some(parse_atom(&self.read_token())),
        }
    }

    fn read_until(&mut self, close: char) -> Vec<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                Some(&c) if c == close => {
                    self.chars.next();
                    return items;
                }
                None => panic!("unterminated collection, expected '{}'", close),
                _ => items.push(self.read().expect("collection element")),
            }
        }
    }

    fn read_string(&mut self) -> Value {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Value::string(&s),
                Some('\\') => match self.chars.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(other) => s.push(other),
                    None => panic!("unterminated string"),
                },
                Some(c) => s.push(c),
                None => panic!("unterminated string"),
            }
        }
    }

    fn read_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || "()[],;\"".contains(c) {
                break;
            }
            token.push(c);
            self.chars.next();
        }
        token
    }
}

fn parse_atom(token: &str) -> Value {
    match token {
        "nil" => Value::Nil,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = token.parse::<i64>() {
                Value::int(n)
            } else if let (true, Ok(n)) = (token.contains('.'), token.parse::<f64>()) {
                Value::float(n)
            } else if let Some(kw) = token.strip_prefix(':') {
                Value::keyword(kw)
            } else {
                Value::symbol(token)
            }
        }
    }
}

/// Read every form in `src`.
pub fn read_all(src: &str) -> Vec<Value> {
    let mut reader = Reader {
        chars: src.chars().peekable(),
    };
    let mut forms = Vec::new();
    while let Some(form) = reader.read() {
        forms.push(form);
    }
    forms
}

/// Read exactly one form.
pub fn read(src: &str) -> Value {
    let mut forms = read_all(src);
    assert_eq!(forms.len(), 1, "expected one form in {:?}", src);
    forms.remove(0)
}

// =============================================================================
// Builders
// =============================================================================

pub fn sym(name: &str) -> Value {
    Value::symbol(name)
}

pub fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

pub fn vector(items: Vec<Value>) -> Value {
    Value::vector(items)
}

// =============================================================================
// Interpreters
// =============================================================================

fn ints(name: &str, args: &[Value]) -> Result<Vec<i64>, Error> {
    args.iter()
        .map(|arg| match arg {
            Value::Int(n) => Ok(*n),
            other => Err(Error::eval(format!(
                "{}: expected int, got {}",
                name,
                other.type_name()
            ))),
        })
        .collect()
}

/// Builder pre-loaded with `+`, `-`, `<`, `=`, `list`, `vector` and `str`.
pub fn interp_builder() -> slurp_core::Builder {
    Interpreter::builder()
        .native("+", |args| Ok(Value::int(ints("+", args)?.iter().sum())))
        .native("-", |args| {
            let ns = ints("-", args)?;
            match ns.split_first() {
                None => Err(Error::eval("-: expected at least one argument")),
                Some((first, [])) => Ok(Value::int(-first)),
                Some((first, rest)) => Ok(Value::int(first - rest.iter().sum::<i64>())),
            }
        })
        .native("<", |args| match args {
            [a, b] => Ok(Value::Bool(compare(a, b)?.is_lt())),
            _ => Err(Error::eval("<: expected two arguments")),
        })
        .native("=", |args| match args {
            [a, b] => Ok(Value::Bool(a == b)),
            _ => Err(Error::eval("=: expected two arguments")),
        })
        .native("list", |args| Ok(Value::list(args.to_vec())))
        .native("vector", |args| Ok(Value::vector(args.to_vec())))
        .native("str", |args| {
            let mut out = String::new();
            for arg in args {
                match arg {
                    Value::String(s) => out.push_str(s),
                    Value::Nil => {}
                    other => out.push_str(&other.to_string()),
                }
            }
            Ok(Value::string(&out))
        })
}

/// An interpreter with the test natives registered.
pub fn new_interp() -> Interpreter {
    interp_builder().build().expect("test natives bind")
}

/// Evaluate every form in `src`, keeping the typed error.
pub fn try_eval(interp: &Interpreter, src: &str) -> Result<Value, Error> {
    interp.eval_all(&read_all(src))
}

/// Evaluate code in the given interpreter.
pub fn eval_str_with(interp: &Interpreter, src: &str) -> Result<Value, String> {
    try_eval(interp, src).map_err(|e| e.to_string())
}

/// Evaluate code in a fresh interpreter.
pub fn eval_str(src: &str) -> Result<Value, String> {
    eval_str_with(&new_interp(), src)
}

/// Assert that code evaluates to an expected value.
#[macro_export]
macro_rules! assert_eval {
    ($code:expr, $expected:expr) => {
        assert_eq!(
            $crate::common::eval_str($code).expect(concat!("eval failed: ", $code)),
            $expected,
            "code: {}",
            $code
        )
    };
}
