use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::Result;

/// Configuration for a [`crate::tracker::Tracker`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    /// Checkpoint file holding the positions of iterators active at halt.
    pub recovery_file: PathBuf,
    /// Capacity of the registration and stop channels. Should be at least
    /// the number of iterators alive at the same time, or notifications
    /// block until the tracker drains them.
    pub buffer_size: usize,
    /// fsync the checkpoint before it replaces the previous one
    pub sync: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        TrackerOptions {
            recovery_file: PathBuf::from("./triewalk.recovery"),
            buffer_size: 64,
            sync: true,
        }
    }
}

impl TrackerOptions {
    pub fn new(recovery_file: impl Into<PathBuf>) -> Self {
        TrackerOptions {
            recovery_file: recovery_file.into(),
            ..Default::default()
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
