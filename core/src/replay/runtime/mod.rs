//! Replay runtime
//!
//! - **Recorder**: Captures gameplay inputs and session metadata
//! - **Player**: Feeds recorded inputs back to the simulation

mod player;
mod recorder;

pub use player::ReplayPlayer;
pub use recorder::{RecorderConfig, ReplayRecorder};
