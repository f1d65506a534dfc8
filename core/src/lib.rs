//! HexReplay Core - replay capture and codec
//!
//! This crate records a session's per-tick input, encodes it into a compact
//! versioned binary layout, and plays it back deterministically.
//!
//! # Architecture
//!
//! - [`replay`] - Input types, recorder, player, codec, compression, transport
//! - [`net`] - Packet container for sending one replay per message
//! - [`config`] - Replay storage settings (TOML)

pub mod config;
pub mod net;
pub mod replay;

// Re-export the replay surface
pub use replay::{
    CompressedReplayFile, DeserializationResult, InputBitset, REPLAY_FORMAT_VERSION,
    RecorderConfig, ReplayData, ReplayFile, ReplayPlayer, ReplayRecorder, ReplaySeed,
    SerializationResult, compress_replay_file, decompress_replay_file,
};

pub use config::ReplayConfig;
pub use net::Packet;
