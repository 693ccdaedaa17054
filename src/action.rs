//! Hotkey actions and the volume step type.
//!
//! [`HotkeyAction`] is the vocabulary the host window manager speaks: one
//! variant per audio key.  [`VolumeDelta`] is the signed percentage handed to
//! the mixer when the volume changes.
//!
//! Actions can be written as CLI names ("increase", "toggle-mute") or as the
//! X keysyms the keys actually produce ("XF86AudioRaiseVolume").

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// One of the three audio hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Unmute if needed, then raise the volume by one step.
    Increase,
    /// Unmute if needed, then lower the volume by one step.
    Decrease,
    /// Flip the mute flag.
    ToggleMute,
}

impl HotkeyAction {
    /// The X keysym conventionally bound to this action.
    pub fn keysym(&self) -> &'static str {
        match self {
            HotkeyAction::Increase => "XF86AudioRaiseVolume",
            HotkeyAction::Decrease => "XF86AudioLowerVolume",
            HotkeyAction::ToggleMute => "XF86AudioMute",
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyAction::Increase => write!(f, "increase"),
            HotkeyAction::Decrease => write!(f, "decrease"),
            HotkeyAction::ToggleMute => write!(f, "toggle-mute"),
        }
    }
}

/// Parse an action name (case-insensitive; accepts "up", "toggle_mute",
/// "XF86AudioMute", etc.).
fn parse_action(s: &str) -> Option<HotkeyAction> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "increase" | "inc" | "up" | "raise" | "xf86audioraisevolume" => {
            Some(HotkeyAction::Increase)
        }
        "decrease" | "dec" | "down" | "lower" | "xf86audiolowervolume" => {
            Some(HotkeyAction::Decrease)
        }
        "togglemute" | "toggle" | "mute" | "xf86audiomute" => Some(HotkeyAction::ToggleMute),
        _ => None,
    }
}

/// Error for an unrecognised action or delta string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("unknown hotkey action: {0:?}")]
    Action(String),
    #[error("invalid volume delta: {0:?}")]
    Delta(String),
}

impl FromStr for HotkeyAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_action(s).ok_or_else(|| ParseActionError::Action(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for HotkeyAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_action(&s).ok_or_else(|| DeError::custom(format!("invalid hotkey action: {:?}", s)))
    }
}

/// Signed volume step in percent.
///
/// Rendered with an explicit sign (`+5`, `-5`) because that is what mixer
/// tools expect for relative changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeDelta(i16);

impl VolumeDelta {
    pub fn new(percent: i16) -> Self {
        Self(percent)
    }

    /// Raise by `step` percent.
    pub fn up(step: u8) -> Self {
        Self(step as i16)
    }

    /// Lower by `step` percent.
    pub fn down(step: u8) -> Self {
        Self(-(step as i16))
    }

    pub fn percent(&self) -> i16 {
        self.0
    }

    /// Size of the step without its sign.
    pub fn magnitude(&self) -> u16 {
        self.0.unsigned_abs()
    }

    pub fn is_increase(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for VolumeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl FromStr for VolumeDelta {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i16>()
            .map(VolumeDelta)
            .map_err(|_| ParseActionError::Delta(s.to_string()))
    }
}
