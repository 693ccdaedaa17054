//! Entry point for the **volkey** binary.
//!
//! The window manager runs one `volkey` process per key press.  Each run
//! loads the configuration, builds the configured mixer backend and
//! notifier, performs a single action and exits.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use volkey::action::HotkeyAction;
use volkey::config::{BackendKind, Config, LogSink};
use volkey::controller::VolumeController;
use volkey::icon::IconSet;
use volkey::mixer::amixer::AmixerBackend;
use volkey::mixer::pulsemixer::PulsemixerBackend;
use volkey::notify::CommandNotifier;
use volkey::traits::AudioBackend;

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(author, about, version, max_term_width = 80)]
struct Options {
    /// Configuration file (default: $XDG_CONFIG_HOME/volkey/config.json).
    #[clap(long, short)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Subcommands,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Unmute if needed and raise the volume by one step.
    Increase,
    /// Unmute if needed and lower the volume by one step.
    Decrease,
    /// Toggle mute.
    ToggleMute,
    /// Run the action bound to an X keysym, e.g. XF86AudioRaiseVolume.
    Key { keysym: HotkeyAction },
    /// Print the current volume and mute state.
    Status,
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/volkey`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("volkey")
}

/// Load the config from `path`, or from the default location when `None`.
///
/// A missing default file means compiled-in defaults.  An explicitly named
/// file must load.  Returns the message to log once logging is up.
fn load_config(path: Option<&Path>) -> Result<(Config, String), String> {
    match path {
        Some(path) => Config::load(path)
            .map(|cfg| (cfg, format!("loaded config from {}", path.display())))
            .map_err(|e| e.to_string()),
        None => {
            let path = config_dir().join("config.json");
            Ok(match Config::load(&path) {
                Ok(cfg) => (cfg, format!("loaded config from {}", path.display())),
                Err(e) => (Config::default(), format!("no config file ({}), using defaults", e)),
            })
        }
    }
}

/// Install env_logger, writing to the configured sink.
fn init_logging(sink: &LogSink) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let LogSink::File(path) = sink {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("volkey: cannot open log file {}: {}", path.display(), e),
        }
    }
    builder.init();
}

fn main() -> ExitCode {
    let options = Options::parse();

    let (config, loaded) = match load_config(options.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            init_logging(&LogSink::Stderr);
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_sink);
    info!("{}", loaded);

    match config.backend {
        BackendKind::Pulsemixer => {
            let backend = PulsemixerBackend::new(config.mixer_binary(), config.max_volume);
            run(backend, &config, options.command)
        }
        BackendKind::Amixer => {
            let backend = AmixerBackend::discover(config.mixer_binary(), &config.available_controls)
                .with_max_volume(config.max_volume);
            run(backend, &config, options.command)
        }
    }
}

fn run<B: AudioBackend>(backend: B, config: &Config, command: Subcommands) -> ExitCode {
    let notifier = CommandNotifier::new(config.notifier_binary.clone(), config.notifier_args.clone());
    let controller = VolumeController::new(backend, notifier, IconSet::new(&config.icon_directory))
        .with_step(config.step)
        .with_toggle_labels(config.toggle_labels);

    let action = match command {
        Subcommands::Increase => HotkeyAction::Increase,
        Subcommands::Decrease => HotkeyAction::Decrease,
        Subcommands::ToggleMute => HotkeyAction::ToggleMute,
        Subcommands::Key { keysym } => keysym,
        Subcommands::Status => {
            return match controller.state() {
                Ok(state) => {
                    let mute = if state.muted { "muted" } else { "unmuted" };
                    println!("{} {}", state.volume, mute);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    warn!("cannot read mixer state: {}", e);
                    ExitCode::FAILURE
                }
            };
        }
    };

    if controller.on_hotkey(action) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
