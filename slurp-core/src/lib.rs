// slurp-core - Analyzer and evaluator for the slurp evaluation core
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # slurp-core
//!
//! Tree-walking evaluation of already-read forms.
//!
//! A form is first turned into an [`Expr`] by the [`Analyzer`], which
//! recognises special forms and expands macros. The expression is then
//! evaluated against an [`Env`]. The root frame is shared and synchronised;
//! child frames carry per-call bindings and are never locked.

pub mod analyzer;
pub mod apply;
pub mod depth;
pub mod env;
pub mod error;
pub mod expr;
pub mod go;
pub mod interpreter;
pub mod specials;

pub use analyzer::{Analyzer, DEFAULT_MAX_EXPANSIONS, SpecialParser};
pub use apply::{NativeFnImpl, apply, apply_fn, make_native_fn};
pub use depth::{DEFAULT_MAX_EVAL_DEPTH, eval_depth, max_eval_depth, set_max_eval_depth};
pub use env::{DEFAULT_NAMESPACE, Env};
pub use error::{Error, Result};
pub use expr::{Expr, resolve_symbol};
pub use go::{GO_FRAME, SpawnPolicy};
pub use interpreter::{Builder, Config, Interpreter};

// Re-export value types for convenience
pub use slurp_value::{Keyword, List, Symbol, Value, Vector};

/// Analyze `form` in `env`, then evaluate the result in the same `env`.
pub fn eval_top(env: &Env, analyzer: &Analyzer, form: &Value) -> Result<Value> {
    analyzer.analyze(env, form)?.eval(env)
}
