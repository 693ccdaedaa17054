//! [`AudioBackend`] implementation backed by the `pulsemixer` CLI.
//!
//! `pulsemixer --get-volume` prints one percentage per channel
//! (`"45 45\n"`); the last one is taken.  `--get-mute` prints `0` or `1`.

use super::process::{CommandRunner, SystemRunner};
use crate::action::VolumeDelta;
use crate::traits::{clamp_percent, AudioBackend, AudioError};
use log::debug;

/// Mixer backed by `pulsemixer`, acting on the default sink.
pub struct PulsemixerBackend<R: CommandRunner = SystemRunner> {
    runner: R,
    binary: String,
    max_volume: u8,
}

impl PulsemixerBackend<SystemRunner> {
    /// Create a backend that runs `binary` as a real subprocess.
    pub fn new(binary: impl Into<String>, max_volume: u8) -> Self {
        Self::with_runner(SystemRunner, binary, max_volume)
    }
}

impl<R: CommandRunner> PulsemixerBackend<R> {
    /// `max_volume` is capped at 100.
    pub fn with_runner(runner: R, binary: impl Into<String>, max_volume: u8) -> Self {
        Self {
            runner,
            binary: binary.into(),
            max_volume: max_volume.min(100),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn query(&self, args: &[&str]) -> Result<String, AudioError> {
        Ok(self.runner.run(&self.binary, args)?.stdout)
    }

    fn control(&self, args: &[&str]) -> Result<(), AudioError> {
        debug!("{} {}", self.binary, args.join(" "));
        self.runner.run(&self.binary, args)?.check(&self.binary)?;
        Ok(())
    }

    fn parse_error(&self, output: &str) -> AudioError {
        AudioError::Parse {
            program: self.binary.clone(),
            output: output.to_string(),
        }
    }
}

/// Last whitespace-separated token of `--get-volume` output, as an integer.
pub fn parse_volume(output: &str) -> Option<i64> {
    output.split_whitespace().last()?.parse().ok()
}

/// `--get-mute` output as a flag: `0` → unmuted, `1` → muted.
pub fn parse_mute(output: &str) -> Option<bool> {
    match output.trim().parse::<i64>().ok()? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

impl<R: CommandRunner> AudioBackend for PulsemixerBackend<R> {
    fn volume(&self) -> Result<u8, AudioError> {
        let out = self.query(&["--get-volume"])?;
        parse_volume(&out)
            .map(clamp_percent)
            .ok_or_else(|| self.parse_error(&out))
    }

    fn muted(&self) -> Result<bool, AudioError> {
        let out = self.query(&["--get-mute"])?;
        parse_mute(&out).ok_or_else(|| self.parse_error(&out))
    }

    fn set_volume(&self, percent: u8) -> Result<(), AudioError> {
        let max = self.max_volume.to_string();
        let value = percent.min(self.max_volume).to_string();
        self.control(&["--max-volume", max.as_str(), "--set-volume", value.as_str()])
    }

    fn change_volume(&self, delta: VolumeDelta) -> Result<(), AudioError> {
        let max = self.max_volume.to_string();
        let delta = delta.to_string();
        self.control(&["--max-volume", max.as_str(), "--change-volume", delta.as_str()])
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.control(&[if muted { "--mute" } else { "--unmute" }])
    }

    fn toggle_mute(&self) -> Result<(), AudioError> {
        self.control(&["--toggle-mute"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mixer::process::ScriptedRunner;

    fn backend(runner: ScriptedRunner) -> PulsemixerBackend<ScriptedRunner> {
        PulsemixerBackend::with_runner(runner, "pulsemixer", 100)
    }

    #[test]
    fn volume_takes_last_channel() {
        let b = backend(ScriptedRunner::new().reply("--get-volume", "40 45\n"));
        assert_eq!(b.volume().unwrap(), 45);
    }

    #[test]
    fn volume_is_clamped() {
        let b = backend(ScriptedRunner::new().reply("--get-volume", "130 130\n"));
        assert_eq!(b.volume().unwrap(), 100);
    }

    #[test]
    fn empty_volume_output_is_parse_error() {
        let b = backend(ScriptedRunner::new().reply("--get-volume", ""));
        assert!(b.volume().unwrap_err().is_parse());
    }

    #[test]
    fn localized_volume_output_is_parse_error() {
        let b = backend(ScriptedRunner::new().reply("--get-volume", "45,0 45,0\n"));
        match b.volume() {
            Err(AudioError::Parse { program, output }) => {
                assert_eq!(program, "pulsemixer");
                assert_eq!(output, "45,0 45,0\n");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn repeated_reads_agree() {
        let b = backend(ScriptedRunner::new().reply("--get-volume", "70 70\n"));
        assert_eq!(b.volume().unwrap(), b.volume().unwrap());
    }

    #[test]
    fn mute_flag() {
        let b = backend(ScriptedRunner::new().reply("--get-mute", "1\n"));
        assert!(b.muted().unwrap());
        let b = backend(ScriptedRunner::new().reply("--get-mute", "0\n"));
        assert!(!b.muted().unwrap());
    }

    #[test]
    fn unexpected_mute_flag_is_parse_error() {
        let b = backend(ScriptedRunner::new().reply("--get-mute", "2\n"));
        assert!(b.muted().unwrap_err().is_parse());
        let b = backend(ScriptedRunner::new().reply("--get-mute", "yes\n"));
        assert!(b.muted().unwrap_err().is_parse());
    }

    #[test]
    fn change_volume_arguments() {
        let b = backend(ScriptedRunner::new());
        b.change_volume(VolumeDelta::up(5)).unwrap();
        b.change_volume(VolumeDelta::down(5)).unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "pulsemixer --max-volume 100 --change-volume +5",
                "pulsemixer --max-volume 100 --change-volume -5",
            ]
        );
    }

    #[test]
    fn set_volume_respects_max() {
        let b = PulsemixerBackend::with_runner(ScriptedRunner::new(), "pulsemixer", 80);
        b.set_volume(95).unwrap();
        assert_eq!(
            b.runner().calls(),
            vec!["pulsemixer --max-volume 80 --set-volume 80"]
        );
    }

    #[test]
    fn configured_max_volume_is_capped_at_100() {
        let cfg: Config = serde_json::from_str(r#"{ "max_volume": 200 }"#).unwrap();
        let b = PulsemixerBackend::with_runner(ScriptedRunner::new(), cfg.mixer_binary(), cfg.max_volume);
        b.change_volume(VolumeDelta::up(5)).unwrap();
        b.set_volume(150).unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "pulsemixer --max-volume 100 --change-volume +5",
                "pulsemixer --max-volume 100 --set-volume 100",
            ]
        );
    }

    #[test]
    fn mute_arguments() {
        let b = backend(ScriptedRunner::new());
        b.set_mute(true).unwrap();
        b.set_mute(false).unwrap();
        b.toggle_mute().unwrap();
        assert_eq!(
            b.runner().calls(),
            vec![
                "pulsemixer --mute",
                "pulsemixer --unmute",
                "pulsemixer --toggle-mute",
            ]
        );
    }

    #[test]
    fn failing_control_is_reported() {
        let b = backend(ScriptedRunner::new().failing());
        assert!(matches!(
            b.toggle_mute(),
            Err(AudioError::ToolFailed { .. })
        ));
    }

    #[test]
    fn missing_binary_is_reported() {
        let b = backend(ScriptedRunner::new().missing());
        assert!(matches!(b.volume(), Err(AudioError::ToolMissing { .. })));
    }
}
