// slurp-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment frames.
//!
//! An [`Env`] is either the *root* frame or a *child* frame:
//!
//! - The root owns one binding table per namespace plus the name of the
//!   active namespace. It has no parent and is shared by every evaluation,
//!   including spawned `go` tasks, so all access goes through a
//!   reader/writer lock.
//! - A child owns the bindings of one call or block and a handle to its
//!   parent. It is never locked. Child frames are copy-on-write: once a
//!   frame is shared (captured by a closure, or reachable from a `go`
//!   task), binding through one handle gives that handle a private copy
//!   and leaves every other holder's view untouched.
//!
//! Functions defined at the root capture the root, and the root holds
//! them, so a root with such bindings is an `Arc` cycle. Call
//! [`Env::clear_globals`] to release it; `Interpreter` does so on drop.
//!
//! [`Env::resolve`] consults the local frame only. Walking outward through
//! parents is the job of the `Resolve` expression.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use slurp_core::Env;
//! use slurp_value::Value;
//!
//! let mut root = Env::new();
//! root.bind("x", Value::int(42)).unwrap();
//!
//! let mut child = root.child("f", HashMap::new());
//! child.bind("x", Value::int(100)).unwrap();
//!
//! assert_eq!(child.resolve("x").unwrap(), Value::int(100));
//! assert_eq!(root.resolve("x").unwrap(), Value::int(42));
//! assert!(child.root().is_root());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use slurp_value::{Symbol, Value};

use crate::error::{Error, Result};

/// Namespace that a fresh root frame starts in.
pub const DEFAULT_NAMESPACE: &str = "user";

const ROOT_NAME: &str = "<root>";

/// A handle to an environment frame. Cloning is cheap.
#[derive(Clone)]
pub struct Env {
    frame: Frame,
}

#[derive(Clone)]
enum Frame {
    Root(Arc<Globals>),
    Child(Arc<Scope>),
}

struct Globals {
    state: RwLock<Namespaces>,
}

struct Namespaces {
    active: String,
    tables: HashMap<String, HashMap<String, Value>>,
}

#[derive(Clone)]
struct Scope {
    name: Arc<str>,
    parent: Env,
    vars: HashMap<String, Value>,
}

fn valid_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(Error::InvalidName(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

// ============================================================================
// Frames
// ============================================================================

impl Env {
    /// Create a root frame whose active namespace is `user`.
    pub fn new() -> Self {
        Env::with_namespace(DEFAULT_NAMESPACE)
    }

    /// Create a root frame with the given active namespace.
    pub fn with_namespace(namespace: &str) -> Self {
        let mut tables = HashMap::new();
        tables.insert(namespace.to_string(), HashMap::new());
        Env {
            frame: Frame::Root(Arc::new(Globals {
                state: RwLock::new(Namespaces {
                    active: namespace.to_string(),
                    tables,
                }),
            })),
        }
    }

    /// Create a child frame of `self` holding `vars`.
    #[must_use]
    pub fn child(&self, name: &str, vars: HashMap<String, Value>) -> Env {
        Env {
            frame: Frame::Child(Arc::new(Scope {
                name: Arc::from(name),
                parent: self.clone(),
                vars,
            })),
        }
    }

    /// Frame name; child frames are named after the function or block
    /// that created them.
    pub fn name(&self) -> &str {
        match &self.frame {
            Frame::Root(_) => ROOT_NAME,
            Frame::Child(scope) => &scope.name,
        }
    }

    pub fn parent(&self) -> Option<&Env> {
        match &self.frame {
            Frame::Root(_) => None,
            Frame::Child(scope) => Some(&scope.parent),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.frame, Frame::Root(_))
    }

    /// The root frame of this chain.
    #[must_use]
    pub fn root(&self) -> Env {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.clone()
    }

    /// Bind `name` in this frame. Binding on the root targets the active
    /// namespace.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<()> {
        let name = valid_name(name)?;
        match &mut self.frame {
            Frame::Root(globals) => {
                let mut state = globals.write();
                let active = state.active.clone();
                state
                    .tables
                    .entry(active)
                    .or_default()
                    .insert(name.to_string(), value);
            }
            Frame::Child(scope) => {
                Arc::make_mut(scope).vars.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Look `name` up in this frame only.
    pub fn resolve(&self, name: &str) -> Result<Value> {
        let found = match &self.frame {
            Frame::Root(globals) => {
                let state = globals.read();
                state
                    .tables
                    .get(&state.active)
                    .and_then(|table| table.get(name))
                    .cloned()
            }
            Frame::Child(scope) => scope.vars.get(name).cloned(),
        };
        found.ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn globals(&self) -> &Globals {
        let mut current = self;
        loop {
            match &current.frame {
                Frame::Root(globals) => return globals,
                Frame::Child(scope) => current = &scope.parent,
            }
        }
    }
}

// ============================================================================
// Namespaces
// ============================================================================

impl Env {
    /// Name of the active namespace.
    pub fn namespace(&self) -> String {
        self.globals().read().active.clone()
    }

    /// Make `namespace` active, creating it if needed.
    pub fn switch_namespace(&self, namespace: &str) -> Result<()> {
        let namespace = valid_name(namespace)?;
        let mut state = self.globals().write();
        state.tables.entry(namespace.to_string()).or_default();
        state.active = namespace.to_string();
        Ok(())
    }

    /// Create `namespace` without switching to it.
    pub fn create_namespace(&self, namespace: &str) -> Result<()> {
        let namespace = valid_name(namespace)?;
        self.globals()
            .write()
            .tables
            .entry(namespace.to_string())
            .or_default();
        Ok(())
    }

    /// Drop every global binding, keeping the namespaces themselves.
    pub fn clear_globals(&self) {
        let released: Vec<HashMap<String, Value>> = {
            let mut state = self.globals().write();
            state.tables.values_mut().map(std::mem::take).collect()
        };
        // Bindings drop here, outside the lock.
        drop(released);
    }

    /// All namespace names, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.globals().read().tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look `name` up in an explicit namespace of the root.
    pub fn resolve_qualified(&self, namespace: &str, name: &str) -> Result<Value> {
        let state = self.globals().read();
        let table = state
            .tables
            .get(namespace)
            .ok_or_else(|| Error::NamespaceNotFound(namespace.to_string()))?;
        table
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{}/{}", namespace, name)))
    }

    /// Bind `name` in an explicit, existing namespace of the root.
    pub fn bind_qualified(&self, namespace: &str, name: &str, value: Value) -> Result<()> {
        let name = valid_name(name)?;
        let mut state = self.globals().write();
        let table = state
            .tables
            .get_mut(namespace)
            .ok_or_else(|| Error::NamespaceNotFound(namespace.to_string()))?;
        table.insert(name.to_string(), value);
        Ok(())
    }

    /// Bind a symbol in the root: qualified symbols go to their namespace,
    /// relative ones to the active namespace.
    pub fn bind_global(&self, symbol: &Symbol, value: Value) -> Result<()> {
        match symbol.namespace() {
            Some(ns) => self.bind_qualified(ns, symbol.name(), value),
            None => {
                let name = valid_name(symbol.name())?;
                let mut state = self.globals().write();
                let active = state.active.clone();
                state
                    .tables
                    .entry(active)
                    .or_default()
                    .insert(name.to_string(), value);
                Ok(())
            }
        }
    }
}

impl Globals {
    // Poisoning is recovered: the tables are plain maps with no invariant a
    // panicking writer could break.
    fn read(&self) -> RwLockReadGuard<'_, Namespaces> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Namespaces> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.frame {
            Frame::Root(globals) => f
                .debug_struct("Env")
                .field("name", &ROOT_NAME)
                .field("namespace", &globals.read().active)
                .finish(),
            Frame::Child(scope) => {
                let mut vars: Vec<&str> = scope.vars.keys().map(String::as_str).collect();
                vars.sort_unstable();
                f.debug_struct("Env")
                    .field("name", &scope.name)
                    .field("vars", &vars)
                    .field("parent", &scope.parent.name())
                    .finish()
            }
        }
    }
}
