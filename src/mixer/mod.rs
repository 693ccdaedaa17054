//! Command-line mixer backends.
//!
//! This module provides concrete implementations of the
//! [`AudioBackend`](crate::traits::AudioBackend) trait that shell out to
//! mixer tools, plus the [`process::CommandRunner`] seam they share.
//!
//! Nothing outside this module should know the argument syntax of any mixer
//! tool.

pub mod amixer;
pub mod process;
pub mod pulsemixer;
