//! Replay recorder
//!
//! Records gameplay inputs and assembles the finished [`ReplayFile`].

use crate::replay::types::{REPLAY_FORMAT_VERSION, ReplayData, ReplayFile, ReplaySeed};

/// Session metadata captured when recording starts
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub player_name: String,
    /// Random seed for the session
    pub seed: ReplaySeed,
    pub pack_id: String,
    pub level_id: String,
    pub first_play: bool,
    pub difficulty_mult: f32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            seed: ReplaySeed::default(),
            pack_id: String::new(),
            level_id: String::new(),
            first_play: false,
            difficulty_mult: 1.0,
        }
    }
}

/// Replay recorder state
pub struct ReplayRecorder {
    config: RecorderConfig,
    data: ReplayData,
    recording: bool,
}

impl ReplayRecorder {
    /// Create a new recorder with the given configuration
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            data: ReplayData::new(),
            recording: false,
        }
    }

    /// Start recording, discarding anything recorded before
    pub fn start(&mut self) {
        self.recording = true;
        self.data = ReplayData::new();
    }

    /// Check if recording is active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Record one tick of input. Ignored while not recording.
    pub fn record_input(&mut self, left: bool, right: bool, swap: bool, focus: bool) {
        if !self.recording {
            return;
        }

        self.data.record_input(left, right, swap, focus);
    }

    /// Ticks recorded so far
    pub fn tick_count(&self) -> usize {
        self.data.size()
    }

    /// Stop recording and build the replay with the achieved score
    pub fn finish(&mut self, played_score: f64) -> ReplayFile {
        self.recording = false;
        tracing::debug!(
            "Finished recording {} ticks for {}/{}",
            self.data.size(),
            self.config.pack_id,
            self.config.level_id
        );

        ReplayFile {
            version: REPLAY_FORMAT_VERSION,
            player_name: self.config.player_name.clone(),
            seed: self.config.seed,
            data: std::mem::take(&mut self.data),
            pack_id: self.config.pack_id.clone(),
            level_id: self.config.level_id.clone(),
            first_play: self.config.first_play,
            difficulty_mult: self.config.difficulty_mult,
            played_score,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }
}
