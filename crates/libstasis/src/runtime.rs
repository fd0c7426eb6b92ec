//! The runtime seen by the resolver and the batch executor
use std::fmt::Display;
use std::path::PathBuf;

use crate::container::ContainerError;

/// Identity of a container as far as reference resolution is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub name: Option<String>,
}

impl ContainerSummary {
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_owned),
        }
    }
}

/// Lifecycle change applied to a single resolved container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pause,
    Resume,
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let print = match *self {
            Self::Pause => "pause",
            Self::Resume => "resume",
        };

        write!(f, "{print}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to read container root {path:?}: {source}")]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("container {0} does not exist")]
    Missing(String),
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Capabilities the batch executor needs from a container runtime.
pub trait Runtime {
    /// Snapshot of every container currently known to the runtime.
    fn containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// Applies `transition` to the container with exactly this ID.
    fn transition(&self, id: &str, transition: Transition) -> Result<(), RuntimeError>;
}
