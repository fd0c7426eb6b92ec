//! Turns SIGINT and SIGTERM into batch cancellation
use anyhow::{Context, Result};
use libstasis::cancel::CancelToken;
use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use once_cell::sync::OnceCell;

static INTERRUPT: OnceCell<CancelToken> = OnceCell::new();

extern "C" fn handle_interrupt(_: libc::c_int) {
    // only an atomic load and store happen here
    if let Some(token) = INTERRUPT.get() {
        token.cancel();
    }
}

/// After this, an interrupt lets the in-flight reference finish and fails
/// the remaining ones instead of killing the process mid-transition.
pub fn cancel_on_interrupt(token: &CancelToken) -> Result<()> {
    if INTERRUPT.set(token.clone()).is_err() {
        tracing::warn!("interrupt handler already installed");
        return Ok(());
    }

    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only touches an already initialized OnceCell
        // and an atomic flag, both async-signal-safe.
        unsafe { sigaction(signal, &action) }
            .with_context(|| format!("failed to install {signal} handler"))?;
    }

    Ok(())
}
