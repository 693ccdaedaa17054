//! **volkey**: volume and mute hotkeys with desktop notifications.
//!
//! A window manager binds its XF86 audio keys to the `volkey` binary.  Each
//! invocation reads the live mixer state, applies one change and announces
//! the result through the desktop notification daemon.  No state is kept
//! between invocations; the mixer is the only source of truth.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::AudioBackend`]: abstracts volume and mute control so the
//!   controller is not coupled to any specific mixer tool.
//! * [`traits::Notifier`]: abstracts the notification transport.
//!
//! Concrete implementations live in [`mixer`] (`pulsemixer` and `amixer`
//! command-line tools) and [`notify`] (`dunstify` / `notify-send`).  The
//! [`controller::VolumeController`] only depends on the traits.

pub mod action;
pub mod config;
pub mod controller;
pub mod icon;
pub mod mixer;
pub mod notify;
pub mod traits;
