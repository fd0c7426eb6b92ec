use super::{Container, ContainerError, ContainerStatus};
use crate::freezer::{self, FreezerState};

impl Container {
    /// Resumes all processes within a paused container
    pub fn resume(&mut self) -> Result<(), ContainerError> {
        self.refresh_status()?;

        if !self.can_resume() {
            tracing::debug!(id = self.id(), status = %self.status(), "refusing to resume");
            return Err(ContainerError::NotPaused(self.id().to_owned()));
        }

        let cgroup_path = self
            .cgroup_path()
            .ok_or_else(|| ContainerError::NoCgroup(self.id().to_owned()))?;
        freezer::apply(cgroup_path, FreezerState::Thawed).map_err(|source| {
            ContainerError::Freezer {
                id: self.id().to_owned(),
                source,
            }
        })?;

        self.set_status(ContainerStatus::Running).save()?;

        tracing::debug!("container {} resumed", self.id());
        Ok(())
    }
}
