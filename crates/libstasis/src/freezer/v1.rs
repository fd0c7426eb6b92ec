use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use super::{write_control_file, FreezerError, FreezerState, WrapIoResult, WrappedIoError};

pub(super) const CGROUP_FREEZER_STATE: &str = "freezer.state";
const FREEZER_STATE_THAWED: &str = "THAWED";
const FREEZER_STATE_FROZEN: &str = "FROZEN";
const FREEZER_STATE_FREEZING: &str = "FREEZING";

const MAX_ATTEMPTS: usize = 1000;

pub(super) fn apply(state: FreezerState, cgroup_path: &Path) -> Result<(), FreezerError> {
    let state_file = cgroup_path.join(CGROUP_FREEZER_STATE);
    match state {
        FreezerState::Undefined => Ok(()),
        FreezerState::Thawed => {
            write_control_file(&state_file, FREEZER_STATE_THAWED)?;
            Ok(())
        }
        FreezerState::Frozen => {
            let result = freeze(&state_file);
            if result.is_err() {
                // a cgroup left in FREEZING is worse than one that was never touched
                let _ = write_control_file(&state_file, FREEZER_STATE_THAWED);
            }
            result
        }
    }
}

// The kernel may report FREEZING for a while on a busy system. Keep writing
// FROZEN, and occasionally thaw and back off, until it settles.
// see:
// https://github.com/opencontainers/runc/blob/b9ee9c6314599f1b4a7f497e1f1f856fe433d3b7/libcontainer/cgroups/fs/freezer.go#L42
fn freeze(state_file: &Path) -> Result<(), FreezerError> {
    for attempt in 0..MAX_ATTEMPTS {
        if attempt % 50 == 49 {
            let _ = write_control_file(state_file, FREEZER_STATE_THAWED);
            thread::sleep(Duration::from_millis(10));
        }

        write_control_file(state_file, FREEZER_STATE_FROZEN)?;

        if attempt % 25 == 24 {
            thread::sleep(Duration::from_millis(10));
        }

        let current = read_state(state_file)?;
        match current.trim() {
            FREEZER_STATE_FREEZING => continue,
            FREEZER_STATE_FROZEN => {
                if attempt > 1 {
                    tracing::debug!("frozen after {} retries", attempt);
                }
                return Ok(());
            }
            _ => return Err(FreezerError::UnknownState { state: current }),
        }
    }

    Err(FreezerError::UnableToFreeze)
}

fn read_state(state_file: &Path) -> Result<String, WrappedIoError> {
    fs::read_to_string(state_file).wrap_read(state_file)
}
