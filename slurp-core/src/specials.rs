// slurp-core - Special form parsers
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Parsers for the built-in special forms.
//!
//! Each parser receives the arguments of the form (everything after the
//! head symbol), validates their count and shape, and builds the matching
//! expression node.

use std::collections::HashMap;
use std::sync::Arc;

use slurp_value::{List, Seq, Symbol, Value, Vector};

use crate::analyzer::{Analyzer, SpecialParser};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::expr::{ArityExpr, DefExpr, Expr, FnExpr, IfExpr};
use crate::go::GoExpr;

pub(crate) fn builtins() -> [(&'static str, SpecialParser); 7] {
    [
        ("do", parse_do),
        ("if", parse_if),
        ("def", parse_def),
        ("fn", parse_fn),
        ("macro", parse_macro),
        ("quote", parse_quote),
        ("go", parse_go),
    ]
}

fn expect_count(
    form: &'static str,
    args: &List,
    allowed: std::ops::RangeInclusive<usize>,
) -> Result<Vec<Value>> {
    let count = args.count();
    if allowed.contains(&count) {
        return Ok(args.to_vec());
    }
    let expected = if allowed.start() == allowed.end() {
        format!("exactly {}", allowed.start())
    } else {
        format!("{} or {}", allowed.start(), allowed.end())
    };
    let noun = if *allowed.end() == 1 { "argument" } else { "arguments" };
    Err(Error::syntax(
        form,
        format!("requires {} {}, got {}", expected, noun, count),
    ))
}

// ============================================================================
// do, if, def, quote, go
// ============================================================================

/// `(do form*)`
pub fn parse_do(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    Ok(Expr::Do(analyzer.analyze_body(env, args)?))
}

/// `(if test then else?)`
pub fn parse_if(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    let forms = expect_count("if", args, 2..=3)?;
    let mut exprs = analyzer.analyze_body(env, &forms)?.into_iter().map(Box::new);
    Ok(Expr::If(IfExpr {
        test: exprs.next(),
        then: exprs.next(),
        otherwise: exprs.next(),
    }))
}

/// `(def name value?)`
pub fn parse_def(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    let forms = expect_count("def", args, 1..=2)?;
    let symbol = match &forms[0] {
        Value::Symbol(sym) => sym.clone(),
        other => {
            return Err(Error::syntax(
                "def",
                format!("first argument must be a symbol, not '{}'", other),
            ));
        }
    };
    let value = match forms.get(1) {
        Some(form) => Some(Box::new(analyzer.analyze(env, form)?)),
        None => None,
    };
    Ok(Expr::Def(DefExpr { symbol, value }))
}

/// `(quote form)`
pub fn parse_quote(_analyzer: &Analyzer, _env: &Env, args: &List) -> Result<Expr> {
    let mut forms = expect_count("quote", args, 1..=1)?;
    Ok(Expr::Quote(forms.remove(0)))
}

/// `(go form)`
pub fn parse_go(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    let forms = expect_count("go", args, 1..=1)?;
    let body = analyzer.analyze(env, &forms[0])?;
    Ok(Expr::Go(GoExpr {
        body: Arc::new(body),
        policy: analyzer.spawn_policy().clone(),
    }))
}

// ============================================================================
// fn and macro
// ============================================================================

/// `(fn name? doc? [params*] body*)` or `(fn name? doc? ([params*] body*)+)`
pub fn parse_fn(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    parse_fn_expr(analyzer, env, args, "fn", false)
}

/// Same shape as `fn`; the result receives unevaluated forms at analysis
/// time.
pub fn parse_macro(analyzer: &Analyzer, env: &Env, args: &List) -> Result<Expr> {
    parse_fn_expr(analyzer, env, args, "macro", true)
}

fn parse_fn_expr(
    analyzer: &Analyzer,
    env: &Env,
    args: &List,
    form: &'static str,
    is_macro: bool,
) -> Result<Expr> {
    let items = args.to_vec();
    let mut rest = items.as_slice();

    let name = match rest {
        [Value::Symbol(sym), tail @ ..] => {
            rest = tail;
            Some(sym.clone())
        }
        _ => None,
    };
    let doc = match rest {
        [Value::String(doc), tail @ ..] if !tail.is_empty() => {
            rest = tail;
            Some(doc.to_string())
        }
        _ => None,
    };

    let arities = match rest {
        [] => return Err(Error::syntax(form, "requires a parameter vector")),
        [Value::Vector(params), body @ ..] => {
            vec![parse_arity(analyzer, env, form, name.as_ref(), params, body)?]
        }
        clauses => clauses
            .iter()
            .map(|clause| parse_clause(analyzer, env, form, name.as_ref(), clause))
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(Expr::Fn(Arc::new(FnExpr {
        name,
        doc,
        is_macro,
        arities,
    })))
}

/// One `([params*] body*)` clause of a multi-arity definition.
fn parse_clause(
    analyzer: &Analyzer,
    env: &Env,
    form: &'static str,
    name: Option<&Symbol>,
    clause: &Value,
) -> Result<ArityExpr> {
    let Value::List(list) = clause else {
        return Err(Error::syntax(
            form,
            format!("expected a parameter vector or arity list, got '{}'", clause),
        ));
    };
    match list.first() {
        Some(Value::Vector(params)) => {
            let body = list.rest().to_vec();
            parse_arity(analyzer, env, form, name, &params, &body)
        }
        _ => Err(Error::syntax(
            form,
            format!("arity list must start with a parameter vector, got '{}'", clause),
        )),
    }
}

fn parse_arity(
    analyzer: &Analyzer,
    env: &Env,
    form: &'static str,
    name: Option<&Symbol>,
    params: &Vector,
    body: &[Value],
) -> Result<ArityExpr> {
    let (params, variadic) = parse_params(form, params)?;

    // Parameters shadow outer bindings while the body is analyzed, so a
    // parameter named like a macro is not expanded.
    let mut shadow: HashMap<String, Value> = HashMap::with_capacity(params.len() + 1);
    if let Some(name) = name {
        shadow.insert(name.name().to_string(), Value::Nil);
    }
    for param in &params {
        shadow.insert(param.name().to_string(), Value::Nil);
    }
    let frame_name = name.map_or("<fn>", |name| name.name());
    let scope = env.child(frame_name, shadow);

    let exprs = analyzer.analyze_body(&scope, body)?;
    Ok(ArityExpr {
        params,
        variadic,
        body: Arc::new(Expr::Do(exprs)),
    })
}

/// Parameter symbols; `& rest` marks the arity variadic and the rest
/// parameter becomes the last entry.
fn parse_params(form: &'static str, params: &Vector) -> Result<(Vec<Symbol>, bool)> {
    let mut out = Vec::with_capacity(params.len());
    let mut iter = params.iter();

    while let Some(param) = iter.next() {
        let sym = param_symbol(form, param)?;
        if sym.name() == "&" {
            return match (iter.next(), iter.next()) {
                (Some(rest), None) => {
                    let rest = param_symbol(form, rest)?;
                    if rest.name() == "&" {
                        return Err(Error::syntax(form, "'&' must be followed by a parameter"));
                    }
                    out.push(rest);
                    Ok((out, true))
                }
                _ => Err(Error::syntax(
                    form,
                    "'&' must be followed by exactly one parameter",
                )),
            };
        }
        out.push(sym);
    }

    Ok((out, false))
}

fn param_symbol(form: &'static str, param: &Value) -> Result<Symbol> {
    match param {
        Value::Symbol(sym) if !sym.is_qualified() && sym.is_valid() => Ok(sym.clone()),
        other => Err(Error::syntax(
            form,
            format!("parameter must be an unqualified symbol, not '{}'", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Value {
        Value::symbol(name)
    }

    fn args(items: Vec<Value>) -> List {
        List::from(items)
    }

    fn syntax_error(result: Result<Expr>) -> (&'static str, String) {
        match result {
            Err(Error::SpecialForm { form, message }) => (form, message),
            other => panic!("expected SpecialForm error, got {other:?}"),
        }
    }

    #[test]
    fn test_if_arity() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let (form, message) = syntax_error(parse_if(&analyzer, &env, &args(vec![Value::Bool(true)])));
        assert_eq!(form, "if");
        assert_eq!(message, "requires 2 or 3 arguments, got 1");

        let four = args(vec![Value::Nil, Value::Nil, Value::Nil, Value::Nil]);
        assert!(parse_if(&analyzer, &env, &four).is_err());
    }

    #[test]
    fn test_if_without_else() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_if(&analyzer, &env, &args(vec![Value::Bool(true), Value::int(1)])).unwrap();
        match expr {
            Expr::If(cond) => assert!(cond.otherwise.is_none()),
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn test_def_requires_symbol() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let (form, message) =
            syntax_error(parse_def(&analyzer, &env, &args(vec![Value::int(1), Value::int(2)])));
        assert_eq!(form, "def");
        assert_eq!(message, "first argument must be a symbol, not '1'");
        assert!(parse_def(&analyzer, &env, &args(vec![])).is_err());
    }

    #[test]
    fn test_quote_exactly_one() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let (_, message) = syntax_error(parse_quote(&analyzer, &env, &args(vec![])));
        assert_eq!(message, "requires exactly 1 argument, got 0");
        let expr = parse_quote(&analyzer, &env, &args(vec![sym("x")])).unwrap();
        assert!(matches!(expr, Expr::Quote(Value::Symbol(_))));
    }

    #[test]
    fn test_go_exactly_one() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let (form, _) = syntax_error(parse_go(&analyzer, &env, &args(vec![Value::Nil, Value::Nil])));
        assert_eq!(form, "go");
    }

    #[test]
    fn test_fn_name_and_doc() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_fn(
            &analyzer,
            &env,
            &args(vec![
                sym("greet"),
                Value::string("Says hello."),
                Value::vector(vec![sym("who")]),
                sym("who"),
            ]),
        )
        .unwrap();
        let Expr::Fn(def) = expr else {
            panic!("expected Fn");
        };
        assert_eq!(def.name, Some(Symbol::new("greet")));
        assert_eq!(def.doc.as_deref(), Some("Says hello."));
        assert!(!def.is_macro);
        assert_eq!(def.arities.len(), 1);
    }

    #[test]
    fn test_fn_string_body_is_not_doc() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_fn(
            &analyzer,
            &env,
            &args(vec![Value::vector(vec![]), Value::string("result")]),
        )
        .unwrap();
        let Expr::Fn(def) = expr else {
            panic!("expected Fn");
        };
        assert!(def.doc.is_none());
    }

    #[test]
    fn test_fn_multi_arity() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_fn(
            &analyzer,
            &env,
            &args(vec![
                Value::list(vec![Value::vector(vec![]), Value::int(1)]),
                Value::list(vec![Value::vector(vec![sym("a")]), sym("a")]),
            ]),
        )
        .unwrap();
        let Expr::Fn(def) = expr else {
            panic!("expected Fn");
        };
        let counts: Vec<usize> = def.arities.iter().map(|a| a.params.len()).collect();
        assert_eq!(counts, vec![0, 1]);
    }

    #[test]
    fn test_fn_variadic_params() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_fn(
            &analyzer,
            &env,
            &args(vec![Value::vector(vec![sym("a"), sym("&"), sym("more")])]),
        )
        .unwrap();
        let Expr::Fn(def) = expr else {
            panic!("expected Fn");
        };
        let arity = &def.arities[0];
        assert!(arity.variadic);
        assert_eq!(arity.params, vec![Symbol::new("a"), Symbol::new("more")]);
    }

    #[test]
    fn test_fn_bad_params() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let cases = vec![
            vec![],
            vec![Value::vector(vec![Value::int(1)])],
            vec![Value::vector(vec![sym("&")])],
            vec![Value::vector(vec![sym("&"), sym("a"), sym("b")])],
            vec![Value::vector(vec![sym("ns/a")])],
            vec![Value::int(3)],
            vec![Value::list(vec![sym("a")])],
        ];
        for case in cases {
            let (form, _) = syntax_error(parse_fn(&analyzer, &env, &args(case)));
            assert_eq!(form, "fn");
        }
    }

    #[test]
    fn test_macro_flag() {
        let analyzer = Analyzer::new();
        let env = Env::new();
        let expr = parse_macro(&analyzer, &env, &args(vec![Value::vector(vec![])])).unwrap();
        let Expr::Fn(def) = expr else {
            panic!("expected Fn");
        };
        assert!(def.is_macro);
    }
}
