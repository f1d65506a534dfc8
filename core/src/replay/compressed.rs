//! Compressed replay format (.ohr.z)
//!
//! The serialized replay run through LZ4 block compression, with the
//! uncompressed size prepended as a little-endian `u32`. There is no other
//! header; callers know from context which format they hold.

use byteorder::{ByteOrder, LittleEndian};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};

use super::MAX_REPLAY_BYTES;
use super::error::CompressionError;
use super::types::ReplayFile;

/// Opaque compressed replay bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedReplayFile {
    data: Vec<u8>,
}

impl CompressedReplayFile {
    /// Wrap bytes that are already compressed
    pub fn from_raw(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Serialize and compress a replay
pub fn try_compress_replay_file(replay: &ReplayFile) -> Result<CompressedReplayFile, CompressionError> {
    let raw = replay.to_bytes()?;
    if raw.len() > MAX_REPLAY_BYTES {
        return Err(CompressionError::TooLarge {
            declared: raw.len(),
            max: MAX_REPLAY_BYTES,
        });
    }
    Ok(CompressedReplayFile {
        data: compress_prepend_size(&raw),
    })
}

/// Decompress and deserialize a replay
pub fn try_decompress_replay_file(
    compressed: &CompressedReplayFile,
) -> Result<ReplayFile, CompressionError> {
    let bytes = compressed.as_bytes();
    if bytes.len() < 4 {
        return Err(CompressionError::Decompress(
            "missing size prefix".to_string(),
        ));
    }

    // Check the declared size before lz4_flex allocates for it
    let declared = LittleEndian::read_u32(&bytes[..4]) as usize;
    if declared > MAX_REPLAY_BYTES {
        return Err(CompressionError::TooLarge {
            declared,
            max: MAX_REPLAY_BYTES,
        });
    }

    let raw = decompress_size_prepended(bytes)
        .map_err(|e| CompressionError::Decompress(e.to_string()))?;
    Ok(ReplayFile::from_bytes(&raw)?)
}

/// Serialize and compress a replay, or `None` on failure
pub fn compress_replay_file(replay: &ReplayFile) -> Option<CompressedReplayFile> {
    match try_compress_replay_file(replay) {
        Ok(compressed) => Some(compressed),
        Err(e) => {
            tracing::warn!("Failed to compress replay: {}", e);
            None
        }
    }
}

/// Decompress and deserialize a replay, or `None` on failure
pub fn decompress_replay_file(compressed: &CompressedReplayFile) -> Option<ReplayFile> {
    match try_decompress_replay_file(compressed) {
        Ok(replay) => Some(replay),
        Err(e) => {
            tracing::warn!("Failed to decompress replay: {}", e);
            None
        }
    }
}
