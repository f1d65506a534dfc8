//! Binary replay format (.ohr)
//!
//! Fixed layout, all integers and floats little-endian, lengths explicit.
//!
//! # File Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ version: u32                                 │
//! │ player_name: u32 len + UTF-8 bytes           │
//! │ seed: u64                                    │
//! │ tick_count: u32                              │
//! │ inputs: ceil(tick_count / 2) packed bytes    │
//! │   low nibble = even tick, high = odd tick    │
//! │ pack_id: u32 len + UTF-8 bytes               │
//! │ level_id: u32 len + UTF-8 bytes              │
//! │ first_play: u8 (0 or 1)                      │
//! │ difficulty_mult: f32                         │
//! │ played_score: f64                            │
//! └──────────────────────────────────────────────┘
//! ```

mod cursor;
mod reader;
mod writer;

pub use cursor::{ByteReader, ByteWriter};
pub use reader::read_replay;
pub use writer::{packed_len, serialized_size, write_replay};

/// Outcome of [`ReplayFile::serialize`](crate::replay::ReplayFile::serialize)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationResult {
    /// Bytes written before success or failure
    pub written_bytes: usize,
    pub success: bool,
}

impl SerializationResult {
    pub(crate) fn ok(written_bytes: usize) -> Self {
        Self {
            written_bytes,
            success: true,
        }
    }

    pub(crate) fn failed(written_bytes: usize) -> Self {
        Self {
            written_bytes,
            success: false,
        }
    }
}

/// Outcome of [`ReplayFile::deserialize`](crate::replay::ReplayFile::deserialize)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializationResult {
    /// Bytes consumed before success or failure
    pub read_bytes: usize,
    pub success: bool,
}

impl DeserializationResult {
    pub(crate) fn ok(read_bytes: usize) -> Self {
        Self {
            read_bytes,
            success: true,
        }
    }

    pub(crate) fn failed(read_bytes: usize) -> Self {
        Self {
            read_bytes,
            success: false,
        }
    }
}
