//! The orchestrator that ties the mixer, the notifier and the icon set
//! together.
//!
//! [`VolumeController`] reacts to [`HotkeyAction`]s with a read-modify-notify
//! sequence against an [`AudioBackend`], announcing the result through a
//! [`Notifier`].  It holds no audio state of its own: every decision is made
//! on a fresh read from the mixer.

use crate::action::{HotkeyAction, VolumeDelta};
use crate::icon::IconSet;
use crate::traits::{AudioBackend, AudioError, AudioState, Notification, Notifier};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wording of the notification sent by the toggle-mute hotkey.
///
/// The historical behaviour announces the state being *left* rather than the
/// state being entered: toggling from muted says "Mute", toggling from
/// unmuted says "Unmute".  `Accurate` names the resulting state instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleLabels {
    #[default]
    Legacy,
    Accurate,
}

/// Reads and changes the mixer state in response to hotkeys.
///
/// The controller is generic over any [`AudioBackend`] and [`Notifier`],
/// making it independent of the tools actually installed.
///
/// # Typical usage
///
/// ```ignore
/// let backend = PulsemixerBackend::new("pulsemixer", 100);
/// let notifier = CommandNotifier::new("dunstify", vec![]);
/// let controller = VolumeController::new(backend, notifier, IconSet::new("/icons"));
/// controller.on_hotkey(HotkeyAction::Increase);
/// ```
pub struct VolumeController<B: AudioBackend, N: Notifier> {
    backend: B,
    notifier: N,
    icons: IconSet,
    step: u8,
    toggle_labels: ToggleLabels,
}

impl<B: AudioBackend, N: Notifier> VolumeController<B, N> {
    /// Create a controller with a 5 % step and legacy toggle labels.
    pub fn new(backend: B, notifier: N, icons: IconSet) -> Self {
        Self {
            backend,
            notifier,
            icons,
            step: 5,
            toggle_labels: ToggleLabels::default(),
        }
    }

    pub fn with_step(mut self, step: u8) -> Self {
        self.step = step;
        self
    }

    pub fn with_toggle_labels(mut self, labels: ToggleLabels) -> Self {
        self.toggle_labels = labels;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    //  Queries

    pub fn get_volume(&self) -> Result<u8, AudioError> {
        self.backend.volume()
    }

    pub fn get_mute_state(&self) -> Result<bool, AudioError> {
        self.backend.muted()
    }

    /// Volume and mute flag, read back to back.
    pub fn state(&self) -> Result<AudioState, AudioError> {
        Ok(AudioState {
            volume: self.get_volume()?,
            muted: self.get_mute_state()?,
        })
    }

    //  Mutations

    pub fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.backend.set_mute(muted)
    }

    pub fn toggle_mute(&self) -> Result<(), AudioError> {
        self.backend.toggle_mute()
    }

    pub fn change_volume(&self, delta: VolumeDelta) -> Result<(), AudioError> {
        self.backend.change_volume(delta)
    }

    /// Send a notification.  The notifier decides what "sent" means; only a
    /// notifier that cannot be launched is an error.
    pub fn notify(&self, text: &str, icon: &Path) -> Result<(), AudioError> {
        debug!("notify {:?} with {}", text, icon.display());
        self.notifier.notify(&Notification::new(icon, text))
    }

    //  Hotkey operations

    /// Unmute if muted, raise the volume by one step, announce the result.
    pub fn increase_volume(&self) -> Result<(), AudioError> {
        self.step_volume(VolumeDelta::up(self.step))
    }

    /// Unmute if muted, lower the volume by one step, announce the result.
    pub fn decrease_volume(&self) -> Result<(), AudioError> {
        self.step_volume(VolumeDelta::down(self.step))
    }

    /// Flip the mute flag and announce it.
    ///
    /// With [`ToggleLabels::Legacy`] the label names the state that was
    /// left; see [`ToggleLabels`].
    pub fn toggle_mute_and_notify(&self) -> Result<(), AudioError> {
        let was_muted = match self.get_mute_state() {
            Ok(m) => m,
            Err(e) if e.is_parse() => {
                warn!("mute state unknown ({}), toggling without notification", e);
                return self.toggle_mute();
            }
            Err(e) => return Err(e),
        };

        self.toggle_mute()?;
        info!("toggled mute, now {}", if was_muted { "unmuted" } else { "muted" });

        // Legacy: announce the state that was just left.
        let announce_muted = match self.toggle_labels {
            ToggleLabels::Legacy => was_muted,
            ToggleLabels::Accurate => !was_muted,
        };

        if announce_muted {
            self.notify("Mute", &self.icons.mute_icon())
        } else {
            match self.get_volume() {
                Ok(v) => self.notify("Unmute", &self.icons.select_icon(v)),
                Err(e) if e.is_parse() => {
                    warn!("volume unknown after toggle ({}), skipping notification", e);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    }

    /// Run one hotkey action, returning any failure.
    pub fn handle(&self, action: HotkeyAction) -> Result<(), AudioError> {
        info!("hotkey {}", action);
        match action {
            HotkeyAction::Increase => self.increase_volume(),
            HotkeyAction::Decrease => self.decrease_volume(),
            HotkeyAction::ToggleMute => self.toggle_mute_and_notify(),
        }
    }

    /// Entry point for the host: run `action` and log instead of failing.
    ///
    /// Returns `true` when the action completed.  Never panics, whatever
    /// the mixer prints.
    pub fn on_hotkey(&self, action: HotkeyAction) -> bool {
        match self.handle(action) {
            Ok(()) => true,
            Err(e) => {
                error!("{} failed: {}", action, e);
                false
            }
        }
    }

    //  Internals

    fn step_volume(&self, delta: VolumeDelta) -> Result<(), AudioError> {
        match self.get_mute_state() {
            Ok(true) => {
                debug!("muted, unmuting before {}", delta);
                self.set_mute(false)?;
            }
            Ok(false) => {}
            Err(e) if e.is_parse() => {
                warn!("mute state unknown ({}), leaving it alone", e);
            }
            Err(e) => return Err(e),
        }

        self.change_volume(delta)?;
        self.notify_volume()
    }

    /// Announce the current volume with its bucket icon.
    fn notify_volume(&self) -> Result<(), AudioError> {
        let volume = match self.get_volume() {
            Ok(v) => v,
            Err(e) if e.is_parse() => {
                warn!("volume unknown ({}), skipping notification", e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        info!("volume now {}", volume);
        self.notify(&format!("Volume : {}", volume), &self.icons.select_icon(volume))
    }
}
