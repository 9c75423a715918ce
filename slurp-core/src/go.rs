// slurp-core - Detached evaluation for `go`
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! `(go form)` evaluates `form` on a new thread.
//!
//! The spawned evaluation runs against a fresh `"<go>"` child of the
//! spawning frame and never shares a lexical frame with its parent for
//! writing; only the root is shared. The spawning call returns `nil` at
//! once. What happens to the outcome is decided by a [`SpawnPolicy`]:
//!
//! - [`SpawnPolicy::Detach`] (the default) discards it. Failures are
//!   logged at `debug` level.
//! - [`SpawnPolicy::Report`] sends every outcome down a channel.
//!
//! There is no cancellation; a task runs to completion or failure.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use slurp_value::Value;

use crate::depth::{ScopedLimit, max_eval_depth};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::expr::Expr;

/// Name of the frame a spawned evaluation runs in.
pub const GO_FRAME: &str = "<go>";

/// What to do with the result of a `go` task.
#[derive(Debug, Clone, Default)]
pub enum SpawnPolicy {
    /// Fire and forget.
    #[default]
    Detach,
    /// Send the outcome, success or failure, to the receiver.
    Report(Sender<Result<Value>>),
}

impl SpawnPolicy {
    /// A reporting policy and the receiving end of its channel.
    pub fn channel() -> (SpawnPolicy, Receiver<Result<Value>>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (SpawnPolicy::Report(tx), rx)
    }

    fn deliver(self, outcome: Result<Value>) {
        match self {
            SpawnPolicy::Detach => {
                if let Err(err) = outcome {
                    tracing::debug!(error = %err, "go task failed; result discarded");
                }
            }
            SpawnPolicy::Report(tx) => {
                // A dropped receiver means nobody is listening any more.
                let _ = tx.send(outcome);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoExpr {
    pub body: Arc<Expr>,
    pub policy: SpawnPolicy,
}

impl GoExpr {
    pub(crate) fn eval(&self, env: &Env) -> Result<Value> {
        let frame = env.child(GO_FRAME, HashMap::new());
        let body = Arc::clone(&self.body);
        let policy = self.policy.clone();
        let max_depth = max_eval_depth();

        thread::Builder::new()
            .name("slurp-go".to_string())
            .spawn(move || {
                let _limit = ScopedLimit::new(max_depth);
                let outcome = body.eval(&frame);
                policy.deliver(outcome);
            })
            .map_err(|e| Error::Spawn(e.to_string()))?;

        tracing::debug!(frame = env.name(), "spawned go task");
        Ok(Value::Nil)
    }
}
