use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nix::unistd::Pid;
use procfs::process::Process;

use crate::container::{ContainerStatus, State, StateError, NAME_ANNOTATION};
use crate::freezer::FreezerError;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("invalid container root {path:?}: {source}")]
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    State(#[from] StateError),
    #[error("failed to inspect container process: {0}")]
    Procfs(#[from] procfs::ProcError),
    #[error("container {0} is already paused")]
    AlreadyPaused(String),
    #[error("container {0} is not running")]
    NotRunning(String),
    #[error("container {0} is not paused")]
    NotPaused(String),
    #[error("container {0} has no cgroup to freeze")]
    NoCgroup(String),
    #[error("failed to change freezer state of container {id}: {source}")]
    Freezer { id: String, source: FreezerError },
}

/// Structure representing the container data
#[derive(Debug, Clone)]
pub struct Container {
    // State of the container
    pub state: State,
    // indicated the directory for the root path in the container
    pub root: PathBuf,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            state: State::default(),
            root: PathBuf::from("/run/stasis"),
        }
    }
}

impl Container {
    pub fn new(
        container_id: &str,
        status: ContainerStatus,
        pid: Option<i32>,
        bundle: &Path,
        container_root: &Path,
    ) -> Result<Self, ContainerError> {
        let root = fs::canonicalize(container_root).map_err(|source| {
            ContainerError::InvalidRoot {
                path: container_root.to_path_buf(),
                source,
            }
        })?;
        let state = State::new(container_id, status, pid, bundle.to_path_buf());

        Ok(Self { state, root })
    }

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn name(&self) -> Option<&str> {
        self.state.name()
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.state
            .annotations
            .get_or_insert_with(HashMap::new)
            .insert(NAME_ANNOTATION.to_owned(), name.to_owned());
        self
    }

    pub fn can_pause(&self) -> bool {
        self.state.status.can_pause()
    }

    pub fn can_resume(&self) -> bool {
        self.state.status.can_resume()
    }

    pub fn bundle(&self) -> &PathBuf {
        &self.state.bundle
    }

    pub fn pid(&self) -> Option<Pid> {
        self.state.pid.map(Pid::from_raw)
    }

    pub fn set_pid(&mut self, pid: i32) -> &mut Self {
        self.state.pid = Some(pid);
        self
    }

    pub fn cgroup_path(&self) -> Option<&Path> {
        self.state.cgroup_path.as_deref()
    }

    pub fn set_cgroup_path(&mut self, cgroup_path: PathBuf) -> &mut Self {
        self.state.cgroup_path = Some(cgroup_path);
        self
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.state.created
    }

    pub fn status(&self) -> ContainerStatus {
        self.state.status
    }

    pub fn set_status(&mut self, status: ContainerStatus) -> &mut Self {
        self.state.status = status;
        self
    }

    /// Reconciles the recorded status with the process table. A container
    /// whose init process is gone is considered stopped.
    pub fn refresh_status(&mut self) -> Result<(), ContainerError> {
        let new_status = match self.pid() {
            Some(pid) => {
                // Process::new only reads /proc/<pid>, nothing is spawned
                if let Ok(proc) = Process::new(pid.as_raw()) {
                    use procfs::process::ProcState;

                    match proc.stat()?.state()? {
                        ProcState::Zombie | ProcState::Dead => ContainerStatus::Stopped,
                        _ => match self.status() {
                            ContainerStatus::Creating
                            | ContainerStatus::Created
                            | ContainerStatus::Paused => self.status(),
                            _ => ContainerStatus::Running,
                        },
                    }
                } else {
                    ContainerStatus::Stopped
                }
            }
            None => ContainerStatus::Stopped,
        };

        self.set_status(new_status);
        Ok(())
    }

    pub fn load(container_root: PathBuf) -> Result<Self, ContainerError> {
        let state = State::load(&container_root)?;
        let mut container = Self {
            state,
            root: container_root,
        };
        container.refresh_status()?;
        Ok(container)
    }

    pub fn save(&self) -> Result<(), ContainerError> {
        tracing::debug!("save container status: {:?} in {:?}", self, self.root);
        self.state.save(&self.root)?;

        Ok(())
    }
}
