//! Execution engine: lifecycle hooks along a resolved command chain.
//!
//! Every node of the chain may run its persistent hooks; only the final
//! command runs `pre_run`, `run` and `post_run`. Persistent post hooks are
//! deferred and run most recent first once the chain is done.

use crate::context::Context;
use crate::error::{ArgsError, ArgsResult};
use crate::path::Path;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Runs on every command of the chain, root first
pub trait PersistentPreRun {
    /// Runs before every descendant, root first
    fn persistent_pre_run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

/// Runs on the final command before [`Run`]
pub trait PreRun {
    /// Runs on the final command before `run`
    fn pre_run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

/// The final command's action
pub trait Run {
    /// Main work of the final command
    fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

/// Runs on the final command after [`Run`]
pub trait PostRun {
    /// Runs on the final command after `run`
    fn post_run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

/// Runs on every command of the chain after everything else, leaf first
pub trait PersistentPostRun {
    /// Runs after everything else, final command first
    fn persistent_post_run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

/// How hook failures affect the hooks still to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnErrorStrategy {
    /// Return the first failure, skipping deferred hooks
    #[default]
    Break,
    /// Still run deferred hooks, stopping at the first one that fails
    PostRunners,
    /// Run every deferred hook regardless of failures
    PostRunnersContinue,
    /// Keep going after any failure
    Continue,
}

/// A lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `PersistentPreRun::persistent_pre_run`
    PersistentPreRun,
    /// `PreRun::pre_run`
    PreRun,
    /// `Run::run`
    Run,
    /// `PostRun::post_run`
    PostRun,
    /// `PersistentPostRun::persistent_post_run`
    PersistentPostRun,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PersistentPreRun => "persistent_pre_run",
            Stage::PreRun => "pre_run",
            Stage::Run => "run",
            Stage::PostRun => "post_run",
            Stage::PersistentPostRun => "persistent_post_run",
        };
        f.write_str(name)
    }
}

/// A failed hook
#[derive(Debug, Error)]
#[error("{stage} hook failed: {error}")]
pub struct HookError {
    /// Stage that failed
    pub stage: Stage,
    /// Command the hook belongs to
    pub command: String,
    /// Error returned by the hook
    #[source]
    pub error: anyhow::Error,
}

const LEAF_STAGES: [Stage; 4] = [Stage::PersistentPreRun, Stage::PreRun, Stage::Run, Stage::PostRun];
const NODE_STAGES: [Stage; 1] = [Stage::PersistentPreRun];

/// Run the hooks of every record on `chain` (root first).
///
/// `chain` pairs each command name with the path of its bound record; all
/// paths start at `root`.
pub(crate) fn execute(
    root: &mut dyn Record,
    chain: &[(String, Path)],
    strategy: OnErrorStrategy,
    ctx: &mut Context,
) -> ArgsResult<()> {
    let mut deferred: Vec<&(String, Path)> = Vec::new();
    let mut failure: Option<Arc<HookError>> = None;
    let last = chain.len().saturating_sub(1);

    'nodes: for (index, node) in chain.iter().enumerate() {
        let (command, path) = node;
        if path.record(&mut *root)?.as_persistent_post_run().is_some() {
            deferred.push(node);
        }

        let stages: &[Stage] = if index == last { &LEAF_STAGES } else { &NODE_STAGES };
        for &stage in stages {
            let record = path.record(&mut *root)?;
            let Some(result) = invoke(record, stage, ctx) else {
                continue;
            };
            debug!(command = %command, stage = %stage, ok = result.is_ok(), "hook finished");

            if let Err(error) = result {
                let err = Arc::new(HookError {
                    stage,
                    command: command.clone(),
                    error,
                });
                failure = Some(err.clone());
                if strategy != OnErrorStrategy::Continue {
                    break 'nodes;
                }
                warn!(command = %command, "continuing after hook failure: {}", err);
                ctx.set_last_error(err);
            }
        }
    }

    if let Some(err) = &failure {
        if strategy == OnErrorStrategy::Break {
            return Err(ArgsError::Hook(err.clone()));
        }
        ctx.set_last_error(err.clone());
    }

    for (command, path) in deferred.into_iter().rev() {
        let record = path.record(&mut *root)?;
        let Some(result) = invoke(record, Stage::PersistentPostRun, ctx) else {
            continue;
        };
        debug!(command = %command, stage = %Stage::PersistentPostRun, ok = result.is_ok(), "hook finished");

        if let Err(error) = result {
            let err = Arc::new(HookError {
                stage: Stage::PersistentPostRun,
                command: command.clone(),
                error,
            });
            if strategy == OnErrorStrategy::PostRunners {
                return Err(ArgsError::Hook(err));
            }
            warn!(command = %command, "continuing after hook failure: {}", err);
            ctx.set_last_error(err.clone());
            failure = Some(err);
        }
    }

    match failure {
        Some(err) => Err(ArgsError::Hook(err)),
        None => Ok(()),
    }
}

/// Invoke `stage` on `record`; None when the record lacks that hook
fn invoke(record: &mut dyn Record, stage: Stage, ctx: &mut Context) -> Option<anyhow::Result<()>> {
    match stage {
        Stage::PersistentPreRun => record.as_persistent_pre_run().map(|h| h.persistent_pre_run(ctx)),
        Stage::PreRun => record.as_pre_run().map(|h| h.pre_run(ctx)),
        Stage::Run => record.as_run().map(|h| h.run(ctx)),
        Stage::PostRun => record.as_post_run().map(|h| h.post_run(ctx)),
        Stage::PersistentPostRun => record
            .as_persistent_post_run()
            .map(|h| h.persistent_post_run(ctx)),
    }
}
