//! Replay capture and codec
//!
//! A replay is the seed plus the per-tick input stream of one session, with
//! enough metadata to pick the right level and check the score:
//!
//! - **Binary format (`.ohr`)** - fixed little-endian layout, two ticks per byte
//! - **Compressed format (`.ohr.z`)** - the binary format run through LZ4
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Recording Mode                        │
//! │ simulation tick → ReplayRecorder → ReplayFile            │
//! │                 → serialize → (compress) → file / packet │
//! └──────────────────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Playback Mode                         │
//! │ file / packet → (decompress) → deserialize → ReplayFile  │
//! │               → ReplayPlayer → simulation tick           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ## Recording Gameplay
//!
//! ```ignore
//! use hexreplay_core::replay::{RecorderConfig, ReplayRecorder, ReplaySeed};
//!
//! let mut recorder = ReplayRecorder::new(RecorderConfig {
//!     player_name: "vee".into(),
//!     seed: ReplaySeed::new(12345),
//!     pack_id: "cube".into(),
//!     level_id: "hexagon".into(),
//!     first_play: false,
//!     difficulty_mult: 1.0,
//! });
//! recorder.start();
//!
//! // During the game loop:
//! recorder.record_input(left, right, swap, focus);
//!
//! let replay = recorder.finish(survival_time);
//! let compressed = compress_replay_file(&replay).expect("valid replay");
//! compressed.serialize_to_file("best.ohr.z");
//! ```
//!
//! ## Playback
//!
//! ```ignore
//! use hexreplay_core::replay::{ReplayPlayer, load_replay_from_path};
//!
//! let replay = load_replay_from_path(path)?;
//! let mut player = ReplayPlayer::new(&replay.data);
//!
//! while !player.done() {
//!     let input = player.get_current_and_move_forward();
//!     // Apply input to the simulation
//! }
//! ```

pub mod binary;
pub mod compressed;
pub mod error;
pub mod runtime;
pub mod transport;
pub mod types;

/// Upper bound on a serialized replay read from disk or decompressed
pub const MAX_REPLAY_BYTES: usize = 64 * 1024 * 1024; // 64 MiB

// Re-export core types
pub use types::{InputBitset, REPLAY_FORMAT_VERSION, ReplayData, ReplayFile, ReplaySeed};

// Re-export binary format
pub use binary::{DeserializationResult, SerializationResult};

// Re-export compression and transport
pub use compressed::{
    CompressedReplayFile, compress_replay_file, decompress_replay_file, try_compress_replay_file,
    try_decompress_replay_file,
};
pub use error::{CodecError, CompressionError, TransportError};
pub use transport::{ReplayEncoding, load_replay_from_path, save_replay_to_path};

// Re-export runtime
pub use runtime::{RecorderConfig, ReplayPlayer, ReplayRecorder};
