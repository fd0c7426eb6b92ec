//! Container records kept in the state directory
/// Every container lives in its own directory below the state root, named
/// after the container ID and holding a `state.json` file. This module reads
/// and writes those records and carries out the pause and resume transitions
/// on a single container.
#[allow(clippy::module_inception)]
mod container;
mod container_pause;
mod container_resume;
pub mod state;
pub use container::{Container, ContainerError};
pub use state::{ContainerStatus, State, StateError, NAME_ANNOTATION};
