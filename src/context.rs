//! Execution context handed to every lifecycle hook.

use crate::executor::HookError;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a context stopped being usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The cancellation token fired
    #[error("context cancelled")]
    Cancelled,
    /// The deadline has passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation, deadline, shared values and the last recorded hook error.
///
/// Hooks receive `&mut Context` and are expected to call [`Context::check`]
/// before long-running work.
#[derive(Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
    last_error: Option<Arc<HookError>>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            values: HashMap::new(),
            last_error: None,
        }
    }
}

impl Context {
    /// Live context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Stop at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Token observed by this context; clone it to cancel from elsewhere
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel this context and every clone sharing its token
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Deadline set by `with_deadline` or `with_timeout`
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancelled or past the deadline
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    /// Error if the context is cancelled or expired
    pub fn check(&self) -> Result<(), ContextError> {
        if self.token.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Most recent hook failure recorded during execution
    pub fn last_error(&self) -> Option<&HookError> {
        self.last_error.as_deref()
    }

    pub(crate) fn set_last_error(&mut self, error: Arc<HookError>) {
        self.last_error = Some(error);
    }

    /// Store a value under `key`, replacing any previous one
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Value stored under `key`, if it has type `T`
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    /// Whether any value is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("cancelled", &self.token.is_cancelled())
            .field("deadline", &self.deadline)
            .field("values", &keys)
            .field("last_error", &self.last_error)
            .finish()
    }
}
