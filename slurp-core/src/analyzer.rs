// slurp-core - Form analysis
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The analyzer turns forms into [`Expr`] trees.
//!
//! Analysis order for a form:
//!
//! 1. `nil` is a constant.
//! 2. Macro calls are expanded, repeatedly, until the head of the form is
//!    no longer a macro. Detection resolves the head symbol speculatively;
//!    a failed lookup just means "not a macro".
//! 3. Symbols become deferred lookups.
//! 4. Non-empty lists are special forms when their head names an entry of
//!    the special-form table, otherwise invocations.
//! 5. Non-empty vectors evaluate their elements.
//! 6. Everything else is self-evaluating.

use std::collections::HashMap;
use std::fmt;

use slurp_value::{List, Seq, Value, Vector};

use crate::apply::apply_fn;
use crate::depth::{DepthGuard, with_stack};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::expr::{Expr, InvokeExpr, VectorExpr, resolve_symbol};
use crate::go::SpawnPolicy;
use crate::specials;

/// Parser for one special form. Receives the form's arguments (everything
/// after the head symbol).
pub type SpecialParser = fn(&Analyzer, &Env, &List) -> Result<Expr>;

/// Default bound on consecutive macro expansions of one form.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1024;

/// Form analyzer with a configurable special-form table.
#[derive(Clone)]
pub struct Analyzer {
    specials: HashMap<String, SpecialParser>,
    max_expansions: usize,
    spawn_policy: SpawnPolicy,
}

impl Analyzer {
    /// Analyzer with the built-in special forms: `do`, `if`, `def`, `fn`,
    /// `macro`, `quote` and `go`.
    pub fn new() -> Self {
        let mut analyzer = Analyzer::bare();
        for (name, parser) in specials::builtins() {
            analyzer.specials.insert(name.to_string(), parser);
        }
        analyzer
    }

    /// Analyzer with an empty special-form table.
    pub fn bare() -> Self {
        Analyzer {
            specials: HashMap::new(),
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            spawn_policy: SpawnPolicy::default(),
        }
    }

    /// Add or replace a special form.
    #[must_use]
    pub fn with_special(mut self, name: &str, parser: SpecialParser) -> Self {
        self.specials.insert(name.to_string(), parser);
        self
    }

    /// Remove a special form; its name analyzes as an ordinary call.
    #[must_use]
    pub fn without_special(mut self, name: &str) -> Self {
        self.specials.remove(name);
        self
    }

    #[must_use]
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = limit;
        self
    }

    /// Policy attached to every `go` form analyzed from here on.
    #[must_use]
    pub fn with_spawn_policy(mut self, policy: SpawnPolicy) -> Self {
        self.spawn_policy = policy;
        self
    }

    pub fn is_special(&self, name: &str) -> bool {
        self.specials.contains_key(name)
    }

    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    pub fn spawn_policy(&self) -> &SpawnPolicy {
        &self.spawn_policy
    }

    /// Analyze `form` in `env`.
    pub fn analyze(&self, env: &Env, form: &Value) -> Result<Expr> {
        let _guard = DepthGuard::enter()?;
        with_stack(|| self.analyze_form(env, form))
    }

    fn analyze_form(&self, env: &Env, form: &Value) -> Result<Expr> {
        if form.is_nil() {
            return Ok(Expr::Const(Value::Nil));
        }

        match self.macroexpand(env, form)? {
            Value::Symbol(sym) => Ok(Expr::Resolve(sym)),
            Value::List(list) if list.is_empty() => Ok(Expr::Const(Value::List(list))),
            Value::List(list) => self.analyze_list(env, &list),
            Value::Vector(items) if items.is_empty() => Ok(Expr::Const(Value::Vector(items))),
            Value::Vector(items) => self.analyze_vector(env, items),
            other => Ok(Expr::Const(other)),
        }
    }

    /// Analyze each form of a body in order.
    pub fn analyze_body<'a>(
        &self,
        env: &Env,
        forms: impl IntoIterator<Item = &'a Value>,
    ) -> Result<Vec<Expr>> {
        forms
            .into_iter()
            .map(|form| self.analyze(env, form))
            .collect()
    }

    /// Expand `form` once if it is a macro call.
    ///
    /// Returns `None` when the head is not a symbol bound to a macro. Any
    /// failure to resolve the head counts as "not a macro"; errors raised
    /// by the macro itself propagate.
    pub fn macroexpand_1(&self, env: &Env, form: &Value) -> Result<Option<Value>> {
        let Value::List(list) = form else {
            return Ok(None);
        };
        let Some(Value::Symbol(head)) = list.first() else {
            return Ok(None);
        };
        let Ok(Value::Fn(func)) = resolve_symbol(env, &head) else {
            return Ok(None);
        };
        if !func.is_macro() {
            return Ok(None);
        }

        tracing::debug!(name = %head, "expanding macro");
        apply_fn(&func, &list.rest().to_vec()).map(Some)
    }

    /// Expand `form` until its head is no longer a macro.
    pub fn macroexpand(&self, env: &Env, form: &Value) -> Result<Value> {
        let mut current = form.clone();
        let mut steps = 0;
        while let Some(expanded) = self.macroexpand_1(env, &current)? {
            steps += 1;
            if steps > self.max_expansions {
                return Err(Error::ExpansionLimit {
                    form: form.to_string(),
                    limit: self.max_expansions,
                });
            }
            current = expanded;
        }
        Ok(current)
    }

    fn analyze_list(&self, env: &Env, list: &List) -> Result<Expr> {
        let Some(head) = list.first() else {
            return Ok(Expr::Const(Value::List(list.clone())));
        };

        let special = match &head {
            Value::Symbol(sym) if !sym.is_qualified() => self.specials.get(sym.name()).copied(),
            _ => None,
        };
        if let Some(parse) = special {
            return parse(self, env, &list.rest());
        }

        let target = self.analyze(env, &head)?;
        let args = self.analyze_body(env, &list.rest())?;
        Ok(Expr::Invoke(InvokeExpr {
            name: head.to_string(),
            target: Box::new(target),
            args,
        }))
    }

    fn analyze_vector(&self, env: &Env, items: Vector) -> Result<Expr> {
        let exprs = self.analyze_body(env, items.iter())?;
        Ok(Expr::Vector(VectorExpr { items, exprs }))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.specials.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Analyzer")
            .field("specials", &names)
            .field("max_expansions", &self.max_expansions)
            .field("spawn_policy", &self.spawn_policy)
            .finish()
    }
}
