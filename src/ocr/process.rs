//! Bounded execution of external processes.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use crossbeam_channel::{after, select, tick};

use crate::error::{Error, Result};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Run a command to completion, killing it if it outlives `timeout`.
///
/// Stdin is closed. Callers must route stdout/stderr to files or null so the
/// child cannot block on a full pipe.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> Result<ExitStatus> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| Error::Ocr(format!("failed to start {}: {}", program, e)))?;

    let ticker = tick(POLL_INTERVAL);
    let deadline = after(timeout);

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        select! {
            recv(ticker) -> _ => {}
            recv(deadline) -> _ => {
                if let Some(status) = child.try_wait()? {
                    return Ok(status);
                }
                if let Err(e) = child.kill() {
                    log::debug!("Failed to kill {}: {}", program, e);
                }
                // Reap the killed child
                child.wait()?;
                return Err(Error::Ocr(format!(
                    "{} timed out after {:?}",
                    program, timeout
                )));
            }
        }
    }
}
