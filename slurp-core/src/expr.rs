// slurp-core - Expression tree
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Analyzed expressions.
//!
//! The analyzer turns forms into [`Expr`] nodes; each node knows how to
//! evaluate itself against an [`Env`]. Nodes are immutable once built and
//! can be shared across threads.

use std::sync::Arc;

use slurp_value::{Erased, FnArity, FnValue, Indexed, Symbol, Value, Vector};

use crate::apply::apply;
use crate::depth::{DepthGuard, with_stack};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::go::{GoExpr, SpawnPolicy};

/// An evaluable expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Self-evaluating value
    Const(Value),
    /// Form returned unevaluated
    Quote(Value),
    /// Global definition
    Def(DefExpr),
    If(IfExpr),
    /// Sequential evaluation, last value wins
    Do(Vec<Expr>),
    /// Symbol lookup through the frame chain
    Resolve(Symbol),
    Invoke(InvokeExpr),
    /// Vector literal with evaluated elements
    Vector(VectorExpr),
    /// Function or macro definition
    Fn(Arc<FnExpr>),
    /// Detached evaluation on another thread
    Go(GoExpr),
}

#[derive(Debug, Clone)]
pub struct DefExpr {
    pub symbol: Symbol,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct IfExpr {
    pub test: Option<Box<Expr>>,
    pub then: Option<Box<Expr>>,
    pub otherwise: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct InvokeExpr {
    /// Printed call target, for error messages
    pub name: String,
    pub target: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct VectorExpr {
    /// The literal as read
    pub items: Vector,
    /// One expression per element
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct FnExpr {
    pub name: Option<Symbol>,
    pub doc: Option<String>,
    pub is_macro: bool,
    pub arities: Vec<ArityExpr>,
}

#[derive(Debug, Clone)]
pub struct ArityExpr {
    pub params: Vec<Symbol>,
    pub variadic: bool,
    pub body: Arc<Expr>,
}

// ============================================================================
// Constructors
// ============================================================================

impl Expr {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Const(value.into())
    }

    pub fn def(symbol: Symbol, value: Option<Expr>) -> Self {
        Expr::Def(DefExpr {
            symbol,
            value: value.map(Box::new),
        })
    }

    pub fn if_else(test: Expr, then: Expr, otherwise: Option<Expr>) -> Self {
        Expr::If(IfExpr {
            test: Some(Box::new(test)),
            then: Some(Box::new(then)),
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn resolve(name: &str) -> Self {
        Expr::Resolve(Symbol::parse(name))
    }

    pub fn invoke(target: Expr, args: Vec<Expr>) -> Self {
        let name = match &target {
            Expr::Resolve(sym) => sym.to_string(),
            Expr::Const(value) | Expr::Quote(value) => value.to_string(),
            _ => "<expr>".to_string(),
        };
        Expr::Invoke(InvokeExpr {
            name,
            target: Box::new(target),
            args,
        })
    }

    pub fn go(body: Expr, policy: SpawnPolicy) -> Self {
        Expr::Go(GoExpr {
            body: Arc::new(body),
            policy,
        })
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl Expr {
    /// Evaluate against `env`.
    pub fn eval(&self, env: &Env) -> Result<Value> {
        let _guard = DepthGuard::enter()?;
        with_stack(|| self.eval_node(env))
    }

    fn eval_node(&self, env: &Env) -> Result<Value> {
        match self {
            Expr::Const(value) | Expr::Quote(value) => Ok(value.clone()),
            Expr::Def(def) => def.eval(env),
            Expr::If(cond) => cond.eval(env),
            Expr::Do(exprs) => eval_do(exprs, env),
            Expr::Resolve(symbol) => resolve_symbol(env, symbol),
            Expr::Invoke(call) => call.eval(env),
            Expr::Vector(vector) => vector.eval(env),
            Expr::Fn(def) => Ok(Value::Fn(def.instantiate(env))),
            Expr::Go(go) => go.eval(env),
        }
    }
}

/// Resolve a symbol from `env`.
///
/// A relative symbol is tried in `env`, then each parent in turn, and the
/// root's answer is final. A qualified symbol is looked up in its
/// namespace on the root.
pub fn resolve_symbol(env: &Env, symbol: &Symbol) -> Result<Value> {
    if let Some(ns) = symbol.namespace() {
        return env.resolve_qualified(ns, symbol.name());
    }

    let mut current = env;
    loop {
        match current.resolve(symbol.name()) {
            Err(Error::NotFound(_)) => match current.parent() {
                Some(parent) => current = parent,
                None => return Err(Error::NotFound(symbol.to_string())),
            },
            found => return found,
        }
    }
}

fn eval_do(exprs: &[Expr], env: &Env) -> Result<Value> {
    let mut result = Value::Nil;
    for expr in exprs {
        result = expr.eval(env)?;
    }
    Ok(result)
}

fn eval_optional(expr: &Option<Box<Expr>>, env: &Env) -> Result<Value> {
    match expr {
        Some(expr) => expr.eval(env),
        None => Ok(Value::Nil),
    }
}

impl DefExpr {
    fn eval(&self, env: &Env) -> Result<Value> {
        let symbol = trimmed(&self.symbol);
        let value = eval_optional(&self.value, env)?;
        env.bind_global(&symbol, value)?;
        tracing::trace!(symbol = %symbol, "def");
        Ok(Value::Symbol(symbol))
    }
}

/// `symbol` with surrounding whitespace removed from its name.
fn trimmed(symbol: &Symbol) -> Symbol {
    let name = symbol.name().trim();
    if name.len() == symbol.name().len() {
        return symbol.clone();
    }
    match symbol.namespace() {
        Some(ns) => Symbol::with_namespace(ns, name),
        None => Symbol::new(name),
    }
}

impl IfExpr {
    fn eval(&self, env: &Env) -> Result<Value> {
        let test = eval_optional(&self.test, env)?;
        if test.is_truthy() {
            eval_optional(&self.then, env)
        } else {
            eval_optional(&self.otherwise, env)
        }
    }
}

impl InvokeExpr {
    fn eval(&self, env: &Env) -> Result<Value> {
        let target = self.target.eval(env)?;
        if !target.is_invokable() {
            return Err(Error::NotInvokable {
                target: self.name.clone(),
                type_name: target.type_name(),
            });
        }

        let args = self
            .args
            .iter()
            .map(|arg| arg.eval(env))
            .collect::<Result<Vec<_>>>()?;
        apply(&target, &args)
    }
}

impl VectorExpr {
    fn eval(&self, env: &Env) -> Result<Value> {
        let mut result = self.items.clone();
        for (index, expr) in self.exprs.iter().enumerate() {
            let value = expr.eval(env)?;
            if result.entry_at(index).as_ref() != Some(&value) {
                result = result.assoc(index, value).ok_or_else(|| {
                    Error::Internal(format!("vector literal has no entry {}", index))
                })?;
            }
        }
        Ok(Value::Vector(result))
    }
}

impl FnExpr {
    /// Build a function value closing over `env`.
    pub fn instantiate(&self, env: &Env) -> FnValue {
        let arities = self
            .arities
            .iter()
            .map(|arity| {
                let body: Erased = arity.body.clone();
                FnArity::new(arity.params.clone(), arity.variadic, body)
            })
            .collect();
        let captured: Erased = Arc::new(env.clone());
        FnValue::new(
            self.name.clone(),
            self.doc.clone(),
            self.is_macro,
            arities,
            captured,
        )
    }
}
