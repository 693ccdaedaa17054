//! [`AudioBackend`] implementation backed by ALSA's `amixer`.
//!
//! Unlike `pulsemixer`, `amixer` addresses a specific sound card and simple
//! control.  Both are discovered at startup:
//!
//! 1. `/proc/asound/modules` lists `<card index> <driver module>` pairs.
//!    Cards driven by a USB module are preferred; without any, card `0` is
//!    used.
//! 2. `amixer -c <card>` lists the card's simple controls
//!    (`Simple mixer control 'Master',0`).  The last control whose name is
//!    in the configured allow-list wins.  Nothing matching falls back to
//!    card `0`, control `Master`.

use super::process::{CommandRunner, SystemRunner};
use crate::action::VolumeDelta;
use crate::traits::{clamp_percent, AudioBackend, AudioError};
use log::{debug, info, warn};

/// Where ALSA lists the driver module of each sound card.
pub const MODULES_PATH: &str = "/proc/asound/modules";

/// Card and control addressed by [`AmixerBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerControl {
    pub card: String,
    pub control: String,
}

impl Default for MixerControl {
    fn default() -> Self {
        Self {
            card: "0".into(),
            control: "Master".into(),
        }
    }
}

/// Card indices whose driver module name contains `usb`.
///
/// Falls back to `["0"]` when there are none.  Malformed lines are skipped.
pub fn usb_cards(modules: &str) -> Vec<String> {
    let cards: Vec<String> = modules
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let index = fields.next()?;
            let module = fields.next()?;
            module.contains("usb").then(|| index.to_string())
        })
        .collect();
    if cards.is_empty() {
        vec!["0".into()]
    } else {
        cards
    }
}

/// Every single-quoted name in `amixer` output, in order.  An unclosed
/// trailing quote yields nothing.
pub fn quoted_names(output: &str) -> Vec<&str> {
    let pieces: Vec<&str> = output.split('\'').collect();
    let closed = (pieces.len() - 1) / 2;
    pieces.into_iter().skip(1).step_by(2).take(closed).collect()
}

/// Percentage from the first `[NN%]` field of `amixer sget` output.
pub fn parse_percent(output: &str) -> Option<i64> {
    output
        .split_whitespace()
        .filter_map(|field| field.strip_prefix('[')?.strip_suffix("%]"))
        .find_map(|n| n.parse().ok())
}

/// Mute flag from the first `[on]` / `[off]` field of `amixer sget` output.
/// `[off]` means the playback switch is open, i.e. muted.
pub fn parse_switch(output: &str) -> Option<bool> {
    output.split_whitespace().find_map(|field| match field {
        "[on]" => Some(false),
        "[off]" => Some(true),
        _ => None,
    })
}

/// Mixer backed by `amixer`, acting on one card/control pair.
pub struct AmixerBackend<R: CommandRunner = SystemRunner> {
    runner: R,
    binary: String,
    target: MixerControl,
    max_volume: u8,
}

impl AmixerBackend<SystemRunner> {
    /// Discover the card and control on the running system.
    pub fn discover(binary: impl Into<String>, available_controls: &[String]) -> Self {
        let modules = match std::fs::read_to_string(MODULES_PATH) {
            Ok(m) => m,
            Err(e) => {
                warn!("cannot read {} ({}), assuming card 0", MODULES_PATH, e);
                String::new()
            }
        };
        Self::discover_with(SystemRunner, binary, available_controls, &modules)
    }
}

impl<R: CommandRunner> AmixerBackend<R> {
    pub fn with_runner(runner: R, binary: impl Into<String>, target: MixerControl) -> Self {
        Self {
            runner,
            binary: binary.into(),
            target,
            max_volume: 100,
        }
    }

    /// Upper bound for volume changes, capped at 100.
    pub fn with_max_volume(mut self, max_volume: u8) -> Self {
        self.max_volume = max_volume.min(100);
        self
    }

    /// Pick the card/control from `modules` (contents of
    /// [`MODULES_PATH`]) by asking `amixer` for each candidate card.
    ///
    /// Cards whose listing cannot be obtained are skipped.
    pub fn discover_with(
        runner: R,
        binary: impl Into<String>,
        available_controls: &[String],
        modules: &str,
    ) -> Self {
        let binary = binary.into();
        let cards = usb_cards(modules);
        info!("candidate cards: {:?}", cards);

        let mut target = MixerControl::default();
        for card in &cards {
            let listing = match runner.run(&binary, &["-c", card.as_str()]) {
                Ok(out) => out.stdout,
                Err(e) => {
                    warn!("cannot list controls of card {}: {}", card, e);
                    continue;
                }
            };
            for name in quoted_names(&listing) {
                if available_controls.iter().any(|c| c == name) {
                    target = MixerControl {
                        card: card.clone(),
                        control: name.to_string(),
                    };
                }
            }
        }
        info!("using card {} control {}", target.card, target.control);
        Self::with_runner(runner, binary, target)
    }

    pub fn target(&self) -> &MixerControl {
        &self.target
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn sget(&self) -> Result<String, AudioError> {
        let out = self.runner.run(
            &self.binary,
            &["-c", self.target.card.as_str(), "sget", self.target.control.as_str()],
        )?;
        Ok(out.stdout)
    }

    fn sset(&self, value: &str) -> Result<(), AudioError> {
        debug!(
            "{} sset {} {} on card {}",
            self.binary, self.target.control, value, self.target.card
        );
        self.runner
            .run(
                &self.binary,
                &[
                    "-q",
                    "-c",
                    self.target.card.as_str(),
                    "sset",
                    self.target.control.as_str(),
                    value,
                ],
            )?
            .check(&self.binary)?;
        Ok(())
    }

    fn parse_error(&self, output: &str) -> AudioError {
        AudioError::Parse {
            program: self.binary.clone(),
            output: output.to_string(),
        }
    }
}

impl<R: CommandRunner> AudioBackend for AmixerBackend<R> {
    fn volume(&self) -> Result<u8, AudioError> {
        let out = self.sget()?;
        parse_percent(&out)
            .map(clamp_percent)
            .ok_or_else(|| self.parse_error(&out))
    }

    fn muted(&self) -> Result<bool, AudioError> {
        let out = self.sget()?;
        parse_switch(&out).ok_or_else(|| self.parse_error(&out))
    }

    fn set_volume(&self, percent: u8) -> Result<(), AudioError> {
        self.sset(&format!("{}%", percent.min(self.max_volume)))
    }

    fn change_volume(&self, delta: VolumeDelta) -> Result<(), AudioError> {
        // amixer stops at 100% on its own; a lower ceiling needs an absolute set.
        if delta.is_increase() && self.max_volume < 100 {
            let target = self.volume()? as i64 + delta.percent() as i64;
            return self.set_volume(clamp_percent(target));
        }
        let sign = if delta.is_increase() { '+' } else { '-' };
        self.sset(&format!("{}%{}", delta.magnitude(), sign))
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.sset(if muted { "mute" } else { "unmute" })
    }

    fn toggle_mute(&self) -> Result<(), AudioError> {
        self.sset("toggle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::process::ScriptedRunner;

    const MODULES: &str = " 0 snd_hda_intel\n 1 snd_usb_audio\n 2 snd_usb_audio\n";

    const SGET: &str = "Simple mixer control 'Master',0
  Capabilities: pvolume pswitch pswitch-joined
  Playback channels: Front Left - Front Right
  Limits: Playback 0 - 87
  Mono:
  Front Left: Playback 39 [45%] [-36.00dB] [off]
  Front Right: Playback 39 [45%] [-36.00dB] [off]
";

    fn controls() -> Vec<String> {
        vec!["Master".into(), "Speaker".into()]
    }

    #[test]
    fn usb_cards_are_selected() {
        assert_eq!(usb_cards(MODULES), vec!["1", "2"]);
    }

    #[test]
    fn no_usb_card_falls_back_to_zero() {
        assert_eq!(usb_cards(" 0 snd_hda_intel\n"), vec!["0"]);
        assert_eq!(usb_cards(""), vec!["0"]);
        assert_eq!(usb_cards("garbage\n"), vec!["0"]);
    }

    #[test]
    fn quoted_names_in_order() {
        let listing = "Simple mixer control 'PCM',0\n  Mono: 5\nSimple mixer control 'Speaker',0\n";
        assert_eq!(quoted_names(listing), vec!["PCM", "Speaker"]);
    }

    #[test]
    fn unclosed_quote_is_ignored() {
        assert_eq!(quoted_names("control 'Master',0\ncontrol 'Speak"), vec!["Master"]);
        assert!(quoted_names("'Master").is_empty());
        assert!(quoted_names("no quotes").is_empty());
    }

    #[test]
    fn parse_sget_output() {
        assert_eq!(parse_percent(SGET), Some(45));
        assert_eq!(parse_switch(SGET), Some(true));
        assert_eq!(parse_switch("Mono: Playback [on]"), Some(false));
        assert_eq!(parse_percent("no numbers here"), None);
    }

    #[test]
    fn discovery_prefers_last_matching_control() {
        let runner = ScriptedRunner::new()
            .reply("-c 1", "Simple mixer control 'PCM',0\n")
            .reply(
                "-c 2",
                "Simple mixer control 'Master',0\nSimple mixer control 'Speaker',0\n",
            );
        let b = AmixerBackend::discover_with(runner, "amixer", &controls(), MODULES);
        assert_eq!(
            b.target(),
            &MixerControl {
                card: "2".into(),
                control: "Speaker".into()
            }
        );
    }

    #[test]
    fn discovery_without_match_uses_default() {
        let runner = ScriptedRunner::new().reply("-c 0", "Simple mixer control 'Headphone',0\n");
        let b = AmixerBackend::discover_with(runner, "amixer", &controls(), "");
        assert_eq!(b.target(), &MixerControl::default());
    }

    #[test]
    fn discovery_survives_missing_binary() {
        let b = AmixerBackend::discover_with(
            ScriptedRunner::new().missing(),
            "amixer",
            &controls(),
            MODULES,
        );
        assert_eq!(b.target(), &MixerControl::default());
    }

    #[test]
    fn reads_volume_and_mute() {
        let runner = ScriptedRunner::new().reply("-c 0 sget Master", SGET);
        let b = AmixerBackend::with_runner(runner, "amixer", MixerControl::default());
        assert_eq!(b.volume().unwrap(), 45);
        assert!(b.muted().unwrap());
    }

    #[test]
    fn empty_sget_is_parse_error() {
        let b = AmixerBackend::with_runner(ScriptedRunner::new(), "amixer", MixerControl::default());
        assert!(b.volume().unwrap_err().is_parse());
        assert!(b.muted().unwrap_err().is_parse());
    }

    #[test]
    fn lower_max_volume_caps_increase() {
        let runner = ScriptedRunner::new().reply("-c 0 sget Master", SGET);
        let b = AmixerBackend::with_runner(runner, "amixer", MixerControl::default())
            .with_max_volume(48);
        b.change_volume(VolumeDelta::up(5)).unwrap();
        b.change_volume(VolumeDelta::down(5)).unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "amixer -c 0 sget Master",
                "amixer -q -c 0 sset Master 48%",
                "amixer -q -c 0 sset Master 5%-",
            ]
        );
    }

    #[test]
    fn max_volume_above_100_is_capped() {
        let b = AmixerBackend::with_runner(ScriptedRunner::new(), "amixer", MixerControl::default())
            .with_max_volume(200);
        b.change_volume(VolumeDelta::up(5)).unwrap();
        b.set_volume(150).unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "amixer -q -c 0 sset Master 5%+",
                "amixer -q -c 0 sset Master 100%",
            ]
        );
    }

    #[test]
    fn control_arguments() {
        let b = AmixerBackend::with_runner(ScriptedRunner::new(), "amixer", MixerControl::default());
        b.change_volume(VolumeDelta::up(5)).unwrap();
        b.change_volume(VolumeDelta::down(5)).unwrap();
        b.set_volume(30).unwrap();
        b.set_mute(false).unwrap();
        b.toggle_mute().unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "amixer -q -c 0 sset Master 5%+",
                "amixer -q -c 0 sset Master 5%-",
                "amixer -q -c 0 sset Master 30%",
                "amixer -q -c 0 sset Master unmute",
                "amixer -q -c 0 sset Master toggle",
            ]
        );
    }
}
