//! The subprocess seam.
//!
//! Every external command volkey runs goes through a [`CommandRunner`].
//! Production code uses [`SystemRunner`]; tests substitute a scripted runner
//! so output parsing can be exercised without any mixer installed.

use crate::traits::AudioError;
use log::trace;
use std::process::{Command, Stdio};

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `true` when the command exited with status 0.
    pub success: bool,
    /// Human-readable exit status, for error messages.
    pub status: String,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
}

impl CommandOutput {
    /// Turn a non-zero exit into [`AudioError::ToolFailed`].
    pub fn check(self, program: &str) -> Result<Self, AudioError> {
        if self.success {
            Ok(self)
        } else {
            Err(AudioError::ToolFailed {
                program: program.to_string(),
                status: self.status,
            })
        }
    }
}

/// Runs a program to completion and captures its output.
///
/// Calls block until the child exits.  There is no timeout.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AudioError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AudioError> {
        trace!("running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| AudioError::ToolMissing {
                program: program.to_string(),
                source,
            })?;
        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedRunner;
