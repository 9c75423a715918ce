// slurp-core - Embedding interface
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! High-level interpreter facade.
//!
//! # Quick Start
//!
//! ```
//! use slurp_core::Interpreter;
//! use slurp_value::Value;
//!
//! let interp = Interpreter::new();
//! let form = Value::list(vec![
//!     Value::symbol("def"),
//!     Value::symbol("x"),
//!     Value::int(10),
//! ]);
//! assert_eq!(interp.eval(&form).unwrap(), Value::symbol("x"));
//! assert_eq!(interp.get("x"), Some(Value::int(10)));
//! ```

use slurp_value::{Symbol, Value};

use crate::analyzer::{Analyzer, DEFAULT_MAX_EXPANSIONS};
use crate::apply::{apply, make_native_fn};
use crate::depth::{DEFAULT_MAX_EVAL_DEPTH, ScopedLimit};
use crate::env::{DEFAULT_NAMESPACE, Env};
use crate::error::Result;
use crate::eval_top;
use crate::expr::{Expr, resolve_symbol};
use crate::go::SpawnPolicy;

/// Interpreter settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum nesting of analysis and evaluation
    pub max_depth: usize,
    /// Maximum consecutive macro expansions of one form
    pub max_expansions: usize,
    /// Namespace active at start
    pub namespace: String,
    /// Outcome handling for `go`
    pub spawn: SpawnPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_EVAL_DEPTH,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            namespace: DEFAULT_NAMESPACE.to_string(),
            spawn: SpawnPolicy::Detach,
        }
    }
}

/// A root environment paired with an analyzer.
///
/// Dropping the interpreter clears its global bindings. Closures or `go`
/// tasks that outlive it still hold the root, but see it empty.
pub struct Interpreter {
    env: Env,
    analyzer: Analyzer,
    max_depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the default configuration.
    pub fn new() -> Self {
        Interpreter::from_config(Config::default(), None)
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    fn from_config(config: Config, analyzer: Option<Analyzer>) -> Self {
        let analyzer = analyzer.unwrap_or_else(|| {
            Analyzer::new()
                .with_max_expansions(config.max_expansions)
                .with_spawn_policy(config.spawn)
        });
        Interpreter {
            env: Env::with_namespace(&config.namespace),
            analyzer,
            max_depth: config.max_depth,
        }
    }

    /// Analyze and evaluate one form in the root environment.
    pub fn eval(&self, form: &Value) -> Result<Value> {
        let _limit = ScopedLimit::new(self.max_depth);
        eval_top(&self.env, &self.analyzer, form)
    }

    /// Evaluate forms in order, returning the last result. Each form is
    /// analyzed only after the previous one has run, so macros defined
    /// earlier apply to later forms.
    pub fn eval_all<'a>(&self, forms: impl IntoIterator<Item = &'a Value>) -> Result<Value> {
        let mut result = Value::Nil;
        for form in forms {
            result = self.eval(form)?;
        }
        Ok(result)
    }

    /// Analyze without evaluating.
    pub fn analyze(&self, form: &Value) -> Result<Expr> {
        let _limit = ScopedLimit::new(self.max_depth);
        self.analyzer.analyze(&self.env, form)
    }

    /// Bind a global. `name` may be qualified (`ns/name`).
    pub fn bind(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.env.bind_global(&Symbol::parse(name), value.into())
    }

    pub fn bind_all<I, K, V>(&self, bindings: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in bindings {
            self.bind(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Register a Rust closure as a global function.
    pub fn register_native<F>(&self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.bind(name, make_native_fn(name, f))
    }

    /// Look up a global by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        resolve_symbol(&self.env, &Symbol::parse(name)).ok()
    }

    /// Call a global function with evaluated arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let func = resolve_symbol(&self.env, &Symbol::parse(name))?;
        let _limit = ScopedLimit::new(self.max_depth);
        apply(&func, args)
    }

    pub fn namespace(&self) -> String {
        self.env.namespace()
    }

    /// Make `namespace` active, creating it if needed.
    pub fn switch_namespace(&self, namespace: &str) -> Result<()> {
        self.env.switch_namespace(namespace)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.env.clear_globals();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Interpreter`].
#[derive(Default)]
pub struct Builder {
    config: Config,
    analyzer: Option<Analyzer>,
    bindings: Vec<(String, Value)>,
}

impl Builder {
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    #[must_use]
    pub fn max_expansions(mut self, limit: usize) -> Self {
        self.config.max_expansions = limit;
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.namespace = namespace.to_string();
        self
    }

    #[must_use]
    pub fn spawn_policy(mut self, policy: SpawnPolicy) -> Self {
        self.config.spawn = policy;
        self
    }

    /// Use a custom analyzer. Its own expansion limit and spawn policy
    /// take precedence over the builder's.
    #[must_use]
    pub fn analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    #[must_use]
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.bindings.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn native<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.bind(name, make_native_fn(name, f))
    }

    /// Build the interpreter; fails if a binding name is invalid.
    pub fn build(self) -> Result<Interpreter> {
        let interp = Interpreter::from_config(self.config, self.analyzer);
        interp.bind_all(self.bindings)?;
        Ok(interp)
    }
}
