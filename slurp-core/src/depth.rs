// slurp-core - Recursion depth guard
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Per-thread recursion accounting for analysis and evaluation.
//!
//! Every nested `analyze` or `eval` call holds a [`DepthGuard`]; exceeding
//! the thread's maximum fails with [`Error::DepthExceeded`]. The guarded
//! work runs through [`with_stack`], which moves onto a fresh heap segment
//! when the thread's stack runs low, so the depth limit is reached before
//! the host stack is exhausted on any thread size.

use std::cell::Cell;

use crate::error::{Error, Result};

/// Default maximum recursion depth.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

/// Remaining stack below which a new segment is allocated.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_EVAL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_EVAL_DEPTH) };
}

/// Set the maximum recursion depth for the current thread.
/// Returns the previous value.
pub fn set_max_eval_depth(depth: usize) -> usize {
    MAX_EVAL_DEPTH.with(|d| d.replace(depth))
}

/// Get the current thread's maximum recursion depth.
pub fn max_eval_depth() -> usize {
    MAX_EVAL_DEPTH.with(|d| d.get())
}

/// Get the current thread's recursion depth.
pub fn eval_depth() -> usize {
    EVAL_DEPTH.with(|d| d.get())
}

pub(crate) struct DepthGuard;

impl DepthGuard {
    pub(crate) fn enter() -> Result<Self> {
        let current = EVAL_DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        let max = max_eval_depth();
        if current > max {
            EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            Err(Error::DepthExceeded(max))
        } else {
            Ok(DepthGuard)
        }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f`, growing the stack first if less than the red zone remains.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}

/// Applies a maximum depth until dropped, then restores the previous one.
pub(crate) struct ScopedLimit {
    previous: usize,
}

impl ScopedLimit {
    pub(crate) fn new(depth: usize) -> Self {
        ScopedLimit {
            previous: set_max_eval_depth(depth),
        }
    }
}

impl Drop for ScopedLimit {
    fn drop(&mut self) {
        set_max_eval_depth(self.previous);
    }
}
