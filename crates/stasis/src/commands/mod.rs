use std::io;
use std::time::Duration;

use libstasis::batch::BatchOptions;
use libstasis::cancel::CancelToken;

pub mod list;
pub mod pause;
pub mod resume;

// Batch settings shared by the transition commands: success lines go to
// stdout and an optional timeout bounds the whole batch.
fn batch_options(cancel: CancelToken, timeout: Option<u64>) -> BatchOptions<io::Stdout> {
    let cancel = match timeout {
        Some(secs) => cancel.with_timeout(Duration::from_secs(secs)),
        None => cancel,
    };
    BatchOptions::new(io::stdout()).with_cancel(cancel)
}
