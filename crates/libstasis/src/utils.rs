//! Utility functionality
use std::fs::DirBuilder;
use std::os::linux::fs::MetadataExt;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use nix::sys::stat::Mode;

const ROOTLESS_ENV: &str = "STASIS_USE_ROOTLESS";

#[derive(Debug, thiserror::Error)]
pub enum MkdirWithModeError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("metadata doesn't match the expected attributes")]
    MetadataMismatch,
}

/// Creates the specified directory and all parent directories with the specified mode. Ensures
/// that the directory has been created with the correct mode and that the owner of the directory
/// is the owner that has been specified
/// # Example
/// ``` no_run
/// use libstasis::utils::create_dir_all_with_mode;
/// use nix::sys::stat::Mode;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/stasis");
/// create_dir_all_with_mode(&path, 1000, Mode::S_IRWXU).unwrap();
/// assert!(path.exists())
/// ```
pub fn create_dir_all_with_mode<P: AsRef<Path>>(
    path: P,
    owner: u32,
    mode: Mode,
) -> Result<(), MkdirWithModeError> {
    let path = path.as_ref();
    if !path.exists() {
        DirBuilder::new()
            .recursive(true)
            .mode(mode.bits())
            .create(path)?;
    }

    let metadata = path.metadata()?;
    if metadata.is_dir()
        && metadata.st_uid() == owner
        && metadata.st_mode() & mode.bits() == mode.bits()
    {
        Ok(())
    } else {
        Err(MkdirWithModeError::MetadataMismatch)
    }
}

/// Reports whether this process runs inside a user namespace other than the
/// initial one. An unreadable uid_map is treated as the initial namespace.
pub fn is_in_new_userns() -> bool {
    match std::fs::read_to_string("/proc/self/uid_map") {
        Ok(content) => !content.contains("4294967295"),
        Err(err) => {
            tracing::warn!(%err, "failed to read /proc/self/uid_map");
            false
        }
    }
}

/// Checks if rootless locations need to be used
pub fn rootless_required() -> bool {
    if std::env::var(ROOTLESS_ENV).is_ok_and(|v| v == "true") {
        return true;
    }
    if !nix::unistd::geteuid().is_root() {
        return true;
    }
    is_in_new_userns()
}
