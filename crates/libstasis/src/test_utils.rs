//! In-memory runtime that records every call, for tests
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use crate::cancel::CancelToken;
use crate::container::ContainerError;
use crate::runtime::{ContainerSummary, Runtime, RuntimeError, Transition};

#[derive(Debug, Default)]
pub struct FakeRuntime {
    containers: RefCell<Vec<ContainerSummary>>,
    failing: HashSet<String>,
    unavailable: bool,
    cancel_on_transition: Option<CancelToken>,
    transitions: RefCell<Vec<(String, Transition)>>,
    list_calls: Cell<usize>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, id: &str, name: Option<&str>) -> Self {
        self.add_container(id, name);
        self
    }

    /// Adds a container between resolutions, like a concurrent `create` would
    pub fn add_container(&self, id: &str, name: Option<&str>) {
        self.containers
            .borrow_mut()
            .push(ContainerSummary::new(id, name));
    }

    /// Transitions on `id` fail with "container <id> is not running"
    pub fn fail_transition(mut self, id: &str) -> Self {
        self.failing.insert(id.to_owned());
        self
    }

    /// Every listing fails as if the runtime could not be reached
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Cancels `token` as soon as the first transition is attempted
    pub fn cancel_on_transition(mut self, token: CancelToken) -> Self {
        self.cancel_on_transition = Some(token);
        self
    }

    pub fn transitions(&self) -> Vec<(String, Transition)> {
        self.transitions.borrow().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }
}

impl Runtime for FakeRuntime {
    fn containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.unavailable {
            return Err(RuntimeError::Unavailable {
                path: PathBuf::from("/fake"),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            });
        }

        Ok(self.containers.borrow().clone())
    }

    fn transition(&self, id: &str, transition: Transition) -> Result<(), RuntimeError> {
        self.transitions
            .borrow_mut()
            .push((id.to_owned(), transition));
        if let Some(token) = &self.cancel_on_transition {
            token.cancel();
        }
        if self.failing.contains(id) {
            return Err(ContainerError::NotRunning(id.to_owned()).into());
        }

        Ok(())
    }
}
