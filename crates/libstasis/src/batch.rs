//! Batch execution of a state transition over a list of references
//! Each reference is resolved and handled on its own. A failure is recorded
//! and the loop moves on, so one bad reference never aborts the batch; the
//! failures are only surfaced together once every reference was walked.
//! Successes are reported on the output sink the moment they happen.
use std::io::Write;

use crate::cancel::CancelToken;
use crate::error::{BatchError, ReferenceError};
use crate::resolver::{Match, Resolver};
use crate::runtime::{Runtime, Transition};

/// Action applied to the result of resolving one reference
pub trait MatchHandler {
    fn apply(&mut self, found: &Match) -> Result<(), ReferenceError>;
}

/// Applies a transition to an unambiguous match and writes the reference to
/// the output sink once the transition succeeded.
pub struct TransitionHandler<'a, R: ?Sized, W> {
    runtime: &'a R,
    transition: Transition,
    stdout: W,
}

impl<'a, R: Runtime + ?Sized, W: Write> TransitionHandler<'a, R, W> {
    pub fn new(runtime: &'a R, transition: Transition, stdout: W) -> Self {
        Self {
            runtime,
            transition,
            stdout,
        }
    }
}

impl<R: Runtime + ?Sized, W: Write> MatchHandler for TransitionHandler<'_, R, W> {
    fn apply(&mut self, found: &Match) -> Result<(), ReferenceError> {
        let reference = &found.reference;
        if found.count() > 1 {
            return Err(ReferenceError::AmbiguousReference {
                reference: reference.to_owned(),
            });
        }
        let container = found.single().ok_or_else(|| ReferenceError::NotFound {
            reference: reference.to_owned(),
        })?;

        tracing::debug!(
            reference = %reference,
            id = %container.id,
            transition = %self.transition,
            "applying transition"
        );
        self.runtime
            .transition(&container.id, self.transition)
            .map_err(|source| ReferenceError::TransitionFailed {
                reference: reference.to_owned(),
                source,
            })?;

        writeln!(self.stdout, "{reference}")
            .and_then(|_| self.stdout.flush())
            .map_err(|source| ReferenceError::Report {
                reference: reference.to_owned(),
                source,
            })
    }
}

/// Caller supplied settings for one batch
pub struct BatchOptions<W> {
    /// Receives one line per successfully transitioned reference
    pub stdout: W,
    pub cancel: CancelToken,
}

impl<W> BatchOptions<W> {
    pub fn new(stdout: W) -> Self {
        Self {
            stdout,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

pub struct BatchExecutor<'a, R: ?Sized, H> {
    resolver: Resolver<'a, R>,
    handler: H,
    cancel: CancelToken,
}

impl<'a, R: Runtime + ?Sized, H: MatchHandler> BatchExecutor<'a, R, H> {
    pub fn new(runtime: &'a R, handler: H, cancel: CancelToken) -> Self {
        Self {
            resolver: Resolver::new(runtime),
            handler,
            cancel,
        }
    }

    /// Walks every reference in order. Once the cancel token fires, the
    /// references not walked yet each fail with the cancellation reason
    /// without touching the runtime. A transition already handed to the
    /// runtime when the token fires completes and is reported as a success.
    pub fn run<S: AsRef<str>>(&mut self, references: &[S]) -> Result<(), BatchError> {
        let mut failures = Vec::new();
        for reference in references {
            let reference = reference.as_ref();
            match self.walk(reference) {
                Ok(0) => failures.push(ReferenceError::NotFound {
                    reference: reference.to_owned(),
                }),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(reference, %err, "reference failed");
                    failures.push(err);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(BatchError::new(failures))
        }
    }

    fn walk(&mut self, reference: &str) -> Result<usize, ReferenceError> {
        self.check_cancelled(reference)?;
        let found = self.resolver.resolve(reference)?;
        if found.count() == 0 {
            return Ok(0);
        }

        self.check_cancelled(reference)?;
        self.handler.apply(&found)?;
        Ok(found.count())
    }

    fn check_cancelled(&self, reference: &str) -> Result<(), ReferenceError> {
        self.cancel
            .check()
            .map_err(|reason| ReferenceError::Cancelled {
                reference: reference.to_owned(),
                reason,
            })
    }
}

/// Applies `transition` to every container named by `references`.
pub fn run<R, W, S>(
    runtime: &R,
    transition: Transition,
    references: &[S],
    options: BatchOptions<W>,
) -> Result<(), BatchError>
where
    R: Runtime + ?Sized,
    W: Write,
    S: AsRef<str>,
{
    let handler = TransitionHandler::new(runtime, transition, options.stdout);
    BatchExecutor::new(runtime, handler, options.cancel).run(references)
}

/// Pauses every container named by `references`.
pub fn pause<R, W, S>(
    runtime: &R,
    references: &[S],
    options: BatchOptions<W>,
) -> Result<(), BatchError>
where
    R: Runtime + ?Sized,
    W: Write,
    S: AsRef<str>,
{
    run(runtime, Transition::Pause, references, options)
}

/// Resumes every container named by `references`.
pub fn resume<R, W, S>(
    runtime: &R,
    references: &[S],
    options: BatchOptions<W>,
) -> Result<(), BatchError>
where
    R: Runtime + ?Sized,
    W: Write,
    S: AsRef<str>,
{
    run(runtime, Transition::Resume, references, options)
}
