use super::{Container, ContainerError, ContainerStatus};
use crate::freezer::{self, FreezerState};

impl Container {
    /// Suspends all processes within the container
    ///
    /// # Example
    ///
    /// ```no_run
    /// use libstasis::container::Container;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut container = Container::load("/run/stasis/74f1a4cb3801".into())?;
    /// container.pause()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn pause(&mut self) -> Result<(), ContainerError> {
        self.refresh_status()?;

        if self.status() == ContainerStatus::Paused {
            return Err(ContainerError::AlreadyPaused(self.id().to_owned()));
        }
        if !self.can_pause() {
            tracing::debug!(id = self.id(), status = %self.status(), "refusing to pause");
            return Err(ContainerError::NotRunning(self.id().to_owned()));
        }

        let cgroup_path = self
            .cgroup_path()
            .ok_or_else(|| ContainerError::NoCgroup(self.id().to_owned()))?;
        freezer::apply(cgroup_path, FreezerState::Frozen).map_err(|source| {
            ContainerError::Freezer {
                id: self.id().to_owned(),
                source,
            }
        })?;

        tracing::debug!("saving paused status");
        self.set_status(ContainerStatus::Paused).save()?;

        tracing::debug!("container {} paused", self.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;

    use super::*;
    use crate::freezer::set_fixture;

    fn running_container(root: &Path, cgroup: &Path) -> Result<Container> {
        let mut container = Container::new(
            "74f1a4cb3801",
            ContainerStatus::Running,
            Some(std::process::id() as i32),
            Path::new("/bundle"),
            root,
        )?;
        container.set_cgroup_path(cgroup.to_path_buf());
        container.save()?;
        Ok(container)
    }

    #[test]
    fn test_pause_running_container() -> Result<()> {
        let root = tempfile::tempdir()?;
        let cgroup = tempfile::tempdir()?;
        set_fixture(cgroup.path(), "freezer.state", "")?;
        let mut container = running_container(root.path(), cgroup.path())?;

        container.pause()?;
        assert_eq!(container.status(), ContainerStatus::Paused);

        let reloaded = Container::load(root.path().to_path_buf())?;
        assert_eq!(reloaded.status(), ContainerStatus::Paused);
        assert_eq!(
            std::fs::read_to_string(cgroup.path().join("freezer.state"))?,
            "FROZEN"
        );
        Ok(())
    }

    #[test]
    fn test_pause_twice() -> Result<()> {
        let root = tempfile::tempdir()?;
        let cgroup = tempfile::tempdir()?;
        set_fixture(cgroup.path(), "freezer.state", "")?;
        let mut container = running_container(root.path(), cgroup.path())?;

        container.pause()?;
        let err = container.pause().unwrap_err();
        assert_eq!(err.to_string(), "container 74f1a4cb3801 is already paused");
        Ok(())
    }

    #[test]
    fn test_pause_stopped_container() -> Result<()> {
        let root = tempfile::tempdir()?;
        let mut container = Container::new(
            "74f1a4cb3801",
            ContainerStatus::Running,
            None,
            Path::new("/bundle"),
            root.path(),
        )?;

        let err = container.pause().unwrap_err();
        assert_eq!(err.to_string(), "container 74f1a4cb3801 is not running");
        Ok(())
    }

    #[test]
    fn test_pause_without_cgroup() -> Result<()> {
        let root = tempfile::tempdir()?;
        let mut container = Container::new(
            "74f1a4cb3801",
            ContainerStatus::Running,
            Some(std::process::id() as i32),
            Path::new("/bundle"),
            root.path(),
        )?;

        let err = container.pause().unwrap_err();
        assert!(matches!(err, ContainerError::NoCgroup(_)));
        assert_eq!(container.status(), ContainerStatus::Running);
        Ok(())
    }
}
