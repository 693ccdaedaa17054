//! Core traits that decouple volkey from any specific mixer or notification
//! daemon.
//!
//! Every concrete backend (`pulsemixer`, `amixer`, a test harness, …)
//! implements one of these traits.  The
//! [`VolumeController`](crate::controller::VolumeController) only depends on
//! these abstractions.

use crate::action::VolumeDelta;
use std::path::{Path, PathBuf};

/// Errors shared by every backend and notifier.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The external binary could not be launched (usually: not on `$PATH`).
    #[error("failed to launch {program}: {source}")]
    ToolMissing {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A mutating command ran but reported failure.
    #[error("{program} exited with {status}")]
    ToolFailed { program: String, status: String },

    /// The tool printed something we could not make sense of.
    #[error("unexpected output from {program}: {output:?}")]
    Parse { program: String, output: String },
}

impl AudioError {
    /// `true` for malformed output, which callers treat as "unknown state"
    /// rather than a hard failure.
    pub fn is_parse(&self) -> bool {
        matches!(self, AudioError::Parse { .. })
    }
}

/// Snapshot of the mixer, read fresh on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioState {
    /// Volume in percent, always within `0..=100`.
    pub volume: u8,
    pub muted: bool,
}

/// Clamp a raw mixer reading to `0..=100`.
pub fn clamp_percent(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Abstraction over an audio mixer.
///
/// Implementations shell out to a command-line tool, but a native binding
/// would fit just as well.  Volume and mute are independent: no method may
/// change the other axis.
pub trait AudioBackend {
    /// Current volume in percent, clamped to `0..=100`.
    fn volume(&self) -> Result<u8, AudioError>;

    /// `true` when the output is muted.
    fn muted(&self) -> Result<bool, AudioError>;

    /// Set the absolute volume.
    fn set_volume(&self, percent: u8) -> Result<(), AudioError>;

    /// Change the volume by a signed step.  The mixer clamps the result.
    fn change_volume(&self, delta: VolumeDelta) -> Result<(), AudioError>;

    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;

    /// Flip the mute flag.
    fn toggle_mute(&self) -> Result<(), AudioError>;
}

/// A desktop notification: an icon and a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub icon: PathBuf,
    pub text: String,
}

impl Notification {
    pub fn new(icon: impl AsRef<Path>, text: impl Into<String>) -> Self {
        Self {
            icon: icon.as_ref().to_path_buf(),
            text: text.into(),
        }
    }
}

/// Sink for desktop notifications.
///
/// # Contract
///
/// Delivery is best effort.  Implementations must not report a daemon that
/// is down or rejects the message; the only error they return is
/// [`AudioError::ToolMissing`] when the notifier itself cannot be launched.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), AudioError>;
}
