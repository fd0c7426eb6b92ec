//! Contains functionality of pause container command
use std::path::PathBuf;

use anyhow::Result;
use libstasis::batch;
use libstasis::cancel::CancelToken;
use libstasis::statedir::StateDirRuntime;
use libstasis_cli::Pause;

use crate::commands::batch_options;

// Pausing a container suspends all processes in it through the freezer
// cgroup. Every reference is tried; the failures are reported together.
pub fn pause(args: Pause, root_path: PathBuf, cancel: CancelToken) -> Result<()> {
    tracing::debug!("start pausing containers {:?}", args.container_ids);
    let runtime = StateDirRuntime::new(root_path);
    batch::pause(
        &runtime,
        &args.container_ids,
        batch_options(cancel, args.timeout),
    )?;
    Ok(())
}
