//! Runtime backed by a directory of container state directories
use std::fs;
use std::path::{Path, PathBuf};

use crate::container::{Container, State};
use crate::runtime::{ContainerSummary, Runtime, RuntimeError, Transition};

/// Each subdirectory of `root` named after a container ID holds that
/// container's `state.json`. Directories without one are ignored.
#[derive(Debug, Clone)]
pub struct StateDirRuntime {
    root: PathBuf,
}

impl StateDirRuntime {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_dirs(&self) -> Result<Vec<PathBuf>, RuntimeError> {
        let unavailable = |source| RuntimeError::Unavailable {
            path: self.root.clone(),
            source,
        };

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            if State::file_path(&path).exists() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Loads every container with its status refreshed from the process
    /// table. Entries that cannot be loaded are skipped.
    pub fn load_all(&self) -> Result<Vec<Container>, RuntimeError> {
        let mut containers = Vec::new();
        for dir in self.container_dirs()? {
            match Container::load(dir.clone()) {
                Ok(container) if dir_matches_id(&dir, container.id()) => {
                    containers.push(container)
                }
                Ok(container) => {
                    tracing::warn!(?dir, id = container.id(), "skipping misplaced container state")
                }
                Err(err) => tracing::warn!(?dir, %err, "skipping unreadable container state"),
            }
        }

        Ok(containers)
    }
}

// transition() finds a container by joining its ID onto the root, so a
// state living under any other directory name is unreachable
fn dir_matches_id(dir: &Path, id: &str) -> bool {
    dir.file_name().is_some_and(|name| name == id)
}

impl Runtime for StateDirRuntime {
    fn containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let mut containers = Vec::new();
        for dir in self.container_dirs()? {
            // a container deleted while we list is simply not part of the snapshot
            match State::load(&dir) {
                Ok(state) if dir_matches_id(&dir, &state.id) => {
                    containers.push(ContainerSummary::new(state.id.as_str(), state.name()))
                }
                Ok(state) => {
                    tracing::warn!(?dir, id = %state.id, "skipping misplaced container state")
                }
                Err(err) => tracing::warn!(?dir, %err, "skipping unreadable container state"),
            }
        }

        Ok(containers)
    }

    fn transition(&self, id: &str, transition: Transition) -> Result<(), RuntimeError> {
        let container_root = self.root.join(id);
        if !State::file_path(&container_root).exists() {
            return Err(RuntimeError::Missing(id.to_owned()));
        }

        let mut container = Container::load(container_root)?;
        match transition {
            Transition::Pause => container.pause()?,
            Transition::Resume => container.resume()?,
        }

        Ok(())
    }
}
