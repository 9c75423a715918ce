// slurp-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application.

use std::collections::HashMap;
use std::sync::Arc;

use slurp_value::{FnArity, FnValue, List, NativeFn, Value};

use crate::env::Env;
use crate::error::{Error, Result};
use crate::expr::Expr;

/// Type alias for native function signature.
pub type NativeFnImpl = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// Name of call frames for anonymous functions.
const ANONYMOUS: &str = "<fn>";

/// Apply an invokable value to already-evaluated arguments.
pub fn apply(func: &Value, args: &[Value]) -> Result<Value> {
    match func {
        Value::Fn(f) => apply_fn(f, args),
        Value::NativeFn(f) => apply_native(f, args),
        other => Err(Error::NotInvokable {
            target: other.to_string(),
            type_name: other.type_name(),
        }),
    }
}

/// Invoke a user-defined function or macro.
///
/// The first arity accepting `args.len()` is chosen. Parameters are bound
/// in a fresh child of the captured environment; the function's own name is
/// bound there too, so named functions can recurse.
pub fn apply_fn(f: &FnValue, args: &[Value]) -> Result<Value> {
    let arity = f.find_arity(args.len()).ok_or_else(|| Error::Arity {
        name: f
            .name()
            .map_or_else(|| ANONYMOUS.to_string(), ToString::to_string),
        expected: f.arity_summary(),
        got: args.len(),
    })?;

    let captured = f
        .env()
        .downcast_ref::<Env>()
        .ok_or_else(|| Error::Internal("function environment is not an Env".to_string()))?;
    let body = arity
        .body
        .downcast_ref::<Expr>()
        .ok_or_else(|| Error::Internal("function body is not an Expr".to_string()))?;

    let frame_name = f.name().map_or(ANONYMOUS, |name| name.name());
    let mut frame = captured.child(frame_name, HashMap::with_capacity(arity.params.len() + 1));
    if let Some(name) = f.name() {
        frame.bind(name.name(), Value::Fn(f.clone()))?;
    }
    bind_params(&mut frame, arity, args)?;

    body.eval(&frame)
}

/// Bind positional parameters, then the rest parameter as a list of the
/// remaining arguments (nil when none remain).
fn bind_params(frame: &mut Env, arity: &FnArity, args: &[Value]) -> Result<()> {
    let required = arity.required();
    for (param, arg) in arity.params[..required].iter().zip(args) {
        frame.bind(param.name(), arg.clone())?;
    }

    if arity.variadic {
        if let Some(rest_param) = arity.params.get(required) {
            let rest = &args[required..];
            let value = if rest.is_empty() {
                Value::Nil
            } else {
                Value::List(rest.iter().cloned().collect::<List>())
            };
            frame.bind(rest_param.name(), value)?;
        }
    }
    Ok(())
}

fn apply_native(f: &NativeFn, args: &[Value]) -> Result<Value> {
    let func = f
        .func()
        .downcast_ref::<Arc<NativeFnImpl>>()
        .ok_or_else(|| Error::Internal(format!("native fn {} has no callable", f.name())))?;
    (**func)(args)
}

/// Wrap a Rust closure as a native function value.
pub fn make_native_fn<F>(name: &str, f: F) -> Value
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
{
    let func: Arc<NativeFnImpl> = Arc::new(f);
    Value::NativeFn(NativeFn::new(name, Arc::new(func)))
}
