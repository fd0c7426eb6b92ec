//! Cgroup freezer access
//! Suspending a container means moving every process in its cgroup into the
//! frozen state. The kernel exposes this through `freezer.state` on cgroup v1
//! hierarchies and through `cgroup.freeze` on the unified (v2) hierarchy.
//! For more information see :
//! https://man7.org/linux/man-pages/man7/cgroups.7.html
//! https://www.kernel.org/doc/Documentation/cgroup-v1/freezer-subsystem.txt
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

mod v1;
mod v2;

/// FreezerState is the requested or observed state of a cgroup freezer
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FreezerState {
    /// Tasks in cgroup are undefined
    Undefined,
    /// Tasks in cgroup are suspended.
    Frozen,
    /// Tasks in cgroup are resuming.
    Thawed,
}

#[derive(thiserror::Error, Debug)]
pub enum WrappedIoError {
    #[error("failed to open {path}: {err}")]
    Open { err: std::io::Error, path: PathBuf },
    #[error("failed to write {data} to {path}: {err}")]
    Write {
        err: std::io::Error,
        path: PathBuf,
        data: String,
    },
    #[error("failed to read {path}: {err}")]
    Read { err: std::io::Error, path: PathBuf },
    #[error("at {path}: {err}")]
    Other { err: std::io::Error, path: PathBuf },
}

pub(crate) trait WrapIoResult {
    type Target;

    fn wrap_open<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError>;
    fn wrap_read<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError>;
    fn wrap_other<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError>;
}

impl<T> WrapIoResult for Result<T, std::io::Error> {
    type Target = T;

    fn wrap_open<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError> {
        self.map_err(|err| WrappedIoError::Open {
            err,
            path: path.into(),
        })
    }

    fn wrap_read<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError> {
        self.map_err(|err| WrappedIoError::Read {
            err,
            path: path.into(),
        })
    }

    fn wrap_other<P: Into<PathBuf>>(self, path: P) -> Result<Self::Target, WrappedIoError> {
        self.map_err(|err| WrappedIoError::Other {
            err,
            path: path.into(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FreezerError {
    #[error("io error: {0}")]
    WrappedIo(#[from] WrappedIoError),
    #[error("freezer not supported in cgroup {0:?}")]
    NotSupported(PathBuf),
    #[error("expected freezer to be in state {expected:?} but was in {actual:?}")]
    ExpectedToBe {
        expected: FreezerState,
        actual: FreezerState,
    },
    #[error("unexpected freezer state: {state}")]
    UnknownState { state: String },
    #[error("timeout of {0} ms reached waiting for the cgroup to freeze")]
    Timeout(u128),
    #[error("unable to freeze")]
    UnableToFreeze,
    #[error("invalid utf8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Moves the cgroup at `cgroup_path` into `state`.
///
/// The hierarchy version is picked from the control files present in the
/// cgroup directory, so the same call works for both v1 and v2 mounts.
pub fn apply(cgroup_path: &Path, state: FreezerState) -> Result<(), FreezerError> {
    if cgroup_path.join(v2::CGROUP_FREEZE).exists() {
        tracing::debug!(?cgroup_path, ?state, "applying v2 freezer state");
        v2::apply(state, cgroup_path)
    } else if cgroup_path.join(v1::CGROUP_FREEZER_STATE).exists() {
        tracing::debug!(?cgroup_path, ?state, "applying v1 freezer state");
        v1::apply(state, cgroup_path)
    } else {
        Err(FreezerError::NotSupported(cgroup_path.to_path_buf()))
    }
}

fn write_control_file(path: &Path, data: &str) -> Result<(), WrappedIoError> {
    fs::OpenOptions::new()
        .create(false)
        .write(true)
        .truncate(false)
        .open(path)
        .wrap_open(path)?
        .write_all(data.as_bytes())
        .map_err(|err| WrappedIoError::Write {
            err,
            path: path.to_path_buf(),
            data: data.into(),
        })
}

#[cfg(test)]
pub(crate) fn set_fixture(dir: &Path, filename: &str, val: &str) -> std::io::Result<PathBuf> {
    let full_path = dir.join(filename);
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&full_path)?
        .write_all(val.as_bytes())?;

    Ok(full_path)
}
