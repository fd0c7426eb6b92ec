//! Contains functionality of resume container command
use std::path::PathBuf;

use anyhow::Result;
use libstasis::batch;
use libstasis::cancel::CancelToken;
use libstasis::statedir::StateDirRuntime;
use libstasis_cli::Resume;

use crate::commands::batch_options;

pub fn resume(args: Resume, root_path: PathBuf, cancel: CancelToken) -> Result<()> {
    tracing::debug!("start resuming containers {:?}", args.container_ids);
    let runtime = StateDirRuntime::new(root_path);
    batch::resume(
        &runtime,
        &args.container_ids,
        batch_options(cancel, args.timeout),
    )?;
    Ok(())
}
