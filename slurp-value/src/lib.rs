// slurp-value - Value model for the slurp evaluation core
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # slurp-value
//!
//! Data model shared by the analyzer and the evaluator: values, interned
//! symbols and keywords, the sequence capabilities, and the callable value
//! types. Reading text into values is left to an external reader.

pub mod compare;
pub mod func;
pub mod keyword;
mod name;
pub mod seq;
pub mod symbol;
pub mod value;

pub use compare::{Incomparable, compare, eq};
pub use func::{Erased, FnArity, FnValue, HostValue, NativeFn};
pub use keyword::Keyword;
pub use seq::{Indexed, List, Seq, Vector};
pub use symbol::Symbol;
pub use value::Value;
