// slurp-core - Property-based tests for resolution and application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for evaluation invariants.
//!
//! Tests the following properties:
//! - the nearest frame binding a name wins during a parent walk
//! - the first arity accepting an argument count is selected
//! - rest parameters collect surplus arguments
//! - def from any nesting depth lands in the root

mod common;

use std::collections::HashMap;

use common::{Error, Value, eval_str, eval_str_with, new_interp};
use proptest::prelude::*;
use slurp_core::{Env, Symbol, resolve_symbol};

// =============================================================================
// Strategies
// =============================================================================

fn arb_small_int() -> impl Strategy<Value = i64> {
    -1000i64..1000i64
}

/// An optional binding of `x` per frame, outermost first.
fn arb_frames() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(arb_small_int()), 0..8)
}

/// Arity shapes as (required, variadic).
fn arb_arities() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..4, any::<bool>()), 1..5)
}

fn clause(index: usize, required: usize, variadic: bool) -> String {
    let mut params: Vec<String> = (0..required).map(|i| format!("p{}", i)).collect();
    if variadic {
        params.push("&".to_string());
        params.push("rest".to_string());
    }
    format!("([{}] {})", params.join(" "), index)
}

// =============================================================================
// Resolution
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Resolving from the innermost frame finds the innermost binding.
    #[test]
    fn nearest_binding_wins(root_value in prop::option::of(arb_small_int()), frames in arb_frames()) {
        let mut env = Env::new();
        if let Some(n) = root_value {
            env.bind("x", Value::int(n)).unwrap();
        }
        for (depth, binding) in frames.iter().enumerate() {
            let mut vars = HashMap::new();
            if let Some(n) = binding {
                vars.insert("x".to_string(), Value::int(*n));
            }
            env = env.child(&format!("frame-{}", depth), vars);
        }

        let expected = frames.iter().rev().flatten().next().copied().or(root_value);
        let result = resolve_symbol(&env, &Symbol::new("x"));
        match expected {
            Some(n) => prop_assert_eq!(result.unwrap(), Value::int(n)),
            None => prop_assert!(matches!(result, Err(Error::NotFound(_)))),
        }
    }

    /// def from any nesting depth binds in the root.
    #[test]
    fn def_lands_in_root(depth in 0usize..6, n in arb_small_int()) {
        let mut code = format!("(def v {})", n);
        for _ in 0..depth {
            code = format!("((fn [] {}))", code);
        }
        let interp = new_interp();
        eval_str_with(&interp, &code).unwrap();
        prop_assert_eq!(interp.env().resolve("v").unwrap(), Value::int(n));
    }
}

// =============================================================================
// Application
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The selected arity is the first one accepting the call.
    #[test]
    fn first_matching_arity(arities in arb_arities(), argc in 0usize..6) {
        let clauses: Vec<String> = arities
            .iter()
            .enumerate()
            .map(|(i, (required, variadic))| clause(i, *required, *variadic))
            .collect();
        let args: Vec<String> = (0..argc).map(|i| i.to_string()).collect();
        let code = format!("((fn {}) {})", clauses.join(" "), args.join(" "));

        let expected = arities.iter().position(|(required, variadic)| {
            if *variadic { argc >= *required } else { argc == *required }
        });
        let result = eval_str(&code);
        match expected {
            Some(index) => prop_assert_eq!(result, Ok(Value::int(index as i64)), "code: {}", code),
            None => prop_assert!(
                result.as_ref().is_err_and(|e| e.starts_with("Wrong number of arguments")),
                "code: {} gave {:?}", code, result
            ),
        }
    }

    /// Surplus arguments arrive as a list; none arrive as nil.
    #[test]
    fn rest_collects_surplus(fixed in 0usize..3, extra in prop::collection::vec(arb_small_int(), 0..5)) {
        let params: Vec<String> = (0..fixed).map(|i| format!("p{}", i)).collect();
        let mut args: Vec<String> = (0..fixed).map(|i| i.to_string()).collect();
        args.extend(extra.iter().map(|n| n.to_string()));
        let code = format!(
            "((fn [{} & more] more) {})",
            params.join(" "),
            args.join(" ")
        );

        let expected = if extra.is_empty() {
            Value::Nil
        } else {
            Value::list(extra.iter().map(|n| Value::int(*n)).collect())
        };
        prop_assert_eq!(eval_str(&code), Ok(expected));
    }
}
