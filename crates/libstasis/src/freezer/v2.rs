use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read, Seek, Write};
use std::path::Path;
use std::str;
use std::thread;
use std::time::Duration;

use super::{FreezerError, FreezerState, WrapIoResult, WrappedIoError};

pub(super) const CGROUP_FREEZE: &str = "cgroup.freeze";
pub(super) const CGROUP_EVENTS: &str = "cgroup.events";

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const MAX_POLLS: u32 = 1000;

pub(super) fn apply(state: FreezerState, cgroup_path: &Path) -> Result<(), FreezerError> {
    let value = match state {
        FreezerState::Undefined => return Ok(()),
        FreezerState::Frozen => "1",
        FreezerState::Thawed => "0",
    };

    let target = cgroup_path.join(CGROUP_FREEZE);
    let mut file = OpenOptions::new()
        .create(false)
        .write(true)
        .open(&target)
        .wrap_open(&target)?;
    file.write_all(value.as_bytes())
        .map_err(|err| WrappedIoError::Write {
            err,
            path: target.clone(),
            data: value.into(),
        })?;

    // the write is only a request; confirm the kernel actually moved the cgroup
    let actual = read_state(cgroup_path)?;
    if actual != state {
        return Err(FreezerError::ExpectedToBe {
            expected: state,
            actual,
        });
    }

    Ok(())
}

fn read_state(cgroup_path: &Path) -> Result<FreezerState, FreezerError> {
    let target = cgroup_path.join(CGROUP_FREEZE);
    let mut buf = [0; 1];
    OpenOptions::new()
        .create(false)
        .read(true)
        .open(&target)
        .wrap_open(&target)?
        .read_exact(&mut buf)
        .wrap_read(&target)?;

    match str::from_utf8(&buf)? {
        "0" => Ok(FreezerState::Thawed),
        "1" => wait_frozen(cgroup_path),
        other => Err(FreezerError::UnknownState {
            state: other.into(),
        }),
    }
}

// Polls cgroup.events until the kernel reports "frozen 1".
fn wait_frozen(cgroup_path: &Path) -> Result<FreezerState, FreezerError> {
    let path = cgroup_path.join(CGROUP_EVENTS);
    let file = OpenOptions::new()
        .create(false)
        .read(true)
        .open(&path)
        .wrap_open(&path)?;
    let mut reader = BufReader::new(file);

    let mut polls = 0;
    let mut line = String::new();
    loop {
        if polls == MAX_POLLS {
            return Err(FreezerError::Timeout(
                POLL_INTERVAL.as_millis() * u128::from(MAX_POLLS),
            ));
        }
        line.clear();
        if reader.read_line(&mut line).wrap_read(&path)? == 0 {
            break;
        }
        if let Some(value) = line.strip_prefix("frozen ") {
            if value.trim() == "1" {
                if polls > 1 {
                    tracing::debug!("frozen after {} polls", polls);
                }
                return Ok(FreezerState::Frozen);
            }
            polls += 1;
            thread::sleep(POLL_INTERVAL);
            reader.rewind().wrap_other(&path)?;
        }
    }

    Ok(FreezerState::Undefined)
}
