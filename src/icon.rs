//! Volume level to notification icon mapping.

use std::path::{Path, PathBuf};

/// Coarse volume level used to pick an icon.
///
/// Buckets are closed on the upper end: `0`, `1..=30`, `31..=60`,
/// `61..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeBucket {
    Mute,
    Low,
    Mid,
    High,
}

impl VolumeBucket {
    pub fn for_volume(volume: u8) -> Self {
        match volume {
            0 => VolumeBucket::Mute,
            1..=30 => VolumeBucket::Low,
            31..=60 => VolumeBucket::Mid,
            _ => VolumeBucket::High,
        }
    }

    /// File name of the icon inside the icon directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            VolumeBucket::Mute => "volume-mute.png",
            VolumeBucket::Low => "volume-low.png",
            VolumeBucket::Mid => "volume-mid.png",
            VolumeBucket::High => "volume-high.png",
        }
    }
}

/// A directory of `volume-{mute,low,mid,high}.png` icons.
///
/// Paths are built, never checked: a missing file is the notifier's
/// problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    directory: PathBuf,
}

impl IconSet {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, bucket: VolumeBucket) -> PathBuf {
        self.directory.join(bucket.file_name())
    }

    /// Icon for a volume level.
    pub fn select_icon(&self, volume: u8) -> PathBuf {
        self.path(VolumeBucket::for_volume(volume))
    }

    pub fn mute_icon(&self) -> PathBuf {
        self.path(VolumeBucket::Mute)
    }
}
