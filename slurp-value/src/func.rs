// slurp-value - Function, native function and host values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Callable and opaque value types.
//!
//! The captured environment and the analyzed bodies of a function are
//! defined by the evaluator crate, so they are stored type-erased here and
//! downcast at invocation time.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::symbol::Symbol;

/// Type-erased payload shared across threads.
pub type Erased = Arc<dyn Any + Send + Sync>;

// ============================================================================
// Function values
// ============================================================================

/// One parameter-list/body variant of a function.
#[derive(Clone)]
pub struct FnArity {
    /// Parameter names. For a variadic arity the last entry is the rest
    /// parameter.
    pub params: Vec<Symbol>,
    pub variadic: bool,
    /// Analyzed body (type-erased).
    pub body: Erased,
}

impl FnArity {
    pub fn new(params: Vec<Symbol>, variadic: bool, body: Erased) -> Self {
        FnArity {
            params,
            variadic,
            body,
        }
    }

    /// Number of positional parameters that must be supplied.
    pub fn required(&self) -> usize {
        if self.variadic {
            self.params.len().saturating_sub(1)
        } else {
            self.params.len()
        }
    }

    /// Exact count, or `argc >= params - 1` for variadic arities.
    pub fn matches(&self, argc: usize) -> bool {
        if self.variadic {
            argc >= self.required()
        } else {
            argc == self.params.len()
        }
    }
}

impl fmt::Debug for FnArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnArity")
            .field("params", &self.params)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct FnInner {
    name: Option<Symbol>,
    doc: Option<String>,
    is_macro: bool,
    arities: Vec<FnArity>,
    env: Erased,
}

/// A user-defined (multi-arity) closure, optionally flagged as a macro.
///
/// Arities are kept in declaration order; [`FnValue::find_arity`] returns
/// the first one that accepts the argument count.
#[derive(Clone)]
pub struct FnValue {
    inner: Arc<FnInner>,
}

impl FnValue {
    pub fn new(
        name: Option<Symbol>,
        doc: Option<String>,
        is_macro: bool,
        arities: Vec<FnArity>,
        env: Erased,
    ) -> Self {
        FnValue {
            inner: Arc::new(FnInner {
                name,
                doc,
                is_macro,
                arities,
                env,
            }),
        }
    }

    pub fn name(&self) -> Option<&Symbol> {
        self.inner.name.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.inner.doc.as_deref()
    }

    pub fn is_macro(&self) -> bool {
        self.inner.is_macro
    }

    pub fn arities(&self) -> &[FnArity] {
        &self.inner.arities
    }

    /// Captured environment (type-erased).
    pub fn env(&self) -> &Erased {
        &self.inner.env
    }

    /// First arity, in declaration order, accepting `argc` arguments.
    pub fn find_arity(&self, argc: usize) -> Option<&FnArity> {
        self.inner.arities.iter().find(|arity| arity.matches(argc))
    }

    /// Human-readable list of accepted argument counts, e.g. `0, 1 or 2+`.
    pub fn arity_summary(&self) -> String {
        let counts: Vec<String> = self
            .inner
            .arities
            .iter()
            .map(|arity| {
                if arity.variadic {
                    format!("{}+", arity.required())
                } else {
                    arity.required().to_string()
                }
            })
            .collect();
        match counts.split_last() {
            None => "none".to_string(),
            Some((last, [])) => last.clone(),
            Some((last, init)) => format!("{} or {}", init.join(", "), last),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &FnValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for FnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_macro() { "macro" } else { "fn" };
        match self.name() {
            Some(name) => write!(f, "#<{} {}>", kind, name),
            None => write!(f, "#<{}>", kind),
        }
    }
}

// ============================================================================
// Native functions
// ============================================================================

/// A host function. The implementation is type-erased; the evaluator
/// stores and downcasts its own callable type.
#[derive(Clone)]
pub struct NativeFn {
    name: Arc<str>,
    func: Erased,
}

impl NativeFn {
    pub fn new(name: &str, func: Erased) -> Self {
        NativeFn {
            name: Arc::from(name),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn func(&self) -> &Erased {
        &self.func
    }

    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

// ============================================================================
// Host values
// ============================================================================

/// An opaque host value carried through evaluation untouched.
#[derive(Clone)]
pub struct HostValue {
    type_name: &'static str,
    value: Erased,
}

impl HostValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        HostValue {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &HostValue) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<host {}>", self.type_name)
    }
}
