//! [`Notifier`] implementation that runs a notification command.
//!
//! The command line is `<binary> <args…> -i <icon> <text>`, which both
//! `dunstify` and `notify-send` accept.  With `dunstify`, passing a stack tag
//! (`-h string:x-dunst-stack-tag:<tag>`) makes each volume notification
//! replace the previous one instead of piling up.

use crate::mixer::process::{CommandRunner, SystemRunner};
use crate::traits::{AudioError, Notification, Notifier};
use log::debug;

/// Runs an external notifier once per notification.
pub struct CommandNotifier<R: CommandRunner = SystemRunner> {
    runner: R,
    binary: String,
    args: Vec<String>,
}

impl CommandNotifier<SystemRunner> {
    pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self::with_runner(SystemRunner, binary, args)
    }
}

impl<R: CommandRunner> CommandNotifier<R> {
    pub fn with_runner(runner: R, binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            args,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> Notifier for CommandNotifier<R> {
    fn notify(&self, notification: &Notification) -> Result<(), AudioError> {
        let icon = notification.icon.to_string_lossy();
        let mut args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        args.extend(["-i", &*icon, notification.text.as_str()]);

        // Best effort: the exit status is logged, never returned.
        let out = self.runner.run(&self.binary, &args)?;
        if !out.success {
            debug!("{} reported {}, ignoring", self.binary, out.status);
        }
        Ok(())
    }
}
