//! Binary replay format reader
//!
//! Decodes a [`ReplayFile`] from a byte buffer. Decoding builds a fresh value
//! and only hands it back once every field has been read.

use super::cursor::ByteReader;
use super::writer::{check_version, packed_len};
use super::DeserializationResult;
use crate::replay::error::CodecError;
use crate::replay::types::*;

/// Read a complete replay through `reader`
pub fn read_replay(reader: &mut ByteReader<'_>) -> Result<ReplayFile, CodecError> {
    let version = reader.read_u32()?;
    check_version(version)?;

    let player_name = reader.read_string("player_name")?;
    let seed = ReplaySeed::new(reader.read_u64()?);
    let data = read_inputs(reader)?;
    let pack_id = reader.read_string("pack_id")?;
    let level_id = reader.read_string("level_id")?;
    let first_play = reader.read_bool()?;
    let difficulty_mult = reader.read_f32()?;
    let played_score = reader.read_f64()?;

    Ok(ReplayFile {
        version,
        player_name,
        seed,
        data,
        pack_id,
        level_id,
        first_play,
        difficulty_mult,
        played_score,
    })
}

/// Read the tick count and unpack the input stream
fn read_inputs(reader: &mut ByteReader<'_>) -> Result<ReplayData, CodecError> {
    let tick_count = reader.read_u32()? as usize;
    // Checked before allocating, so a corrupt count cannot trigger a huge reservation
    let packed = reader.read_bytes(packed_len(tick_count))?;

    let mut data = ReplayData::with_capacity(tick_count);
    for (i, byte) in packed.iter().enumerate() {
        data.push(InputBitset::from_nibble(byte & 0x0F));
        // The high nibble of the last byte is padding when tick_count is odd
        if 2 * i + 1 < tick_count {
            data.push(InputBitset::from_nibble(byte >> 4));
        }
    }
    Ok(data)
}

impl ReplayFile {
    /// Deserialize from `buffer`, replacing `self` only on success.
    ///
    /// On failure `self` is left untouched and `read_bytes` reports how far
    /// the reader got.
    pub fn deserialize(&mut self, buffer: &[u8]) -> DeserializationResult {
        let mut reader = ByteReader::new(buffer);
        match read_replay(&mut reader) {
            Ok(replay) => {
                *self = replay;
                DeserializationResult::ok(reader.position())
            }
            Err(e) => {
                tracing::debug!("Replay deserialization failed: {}", e);
                DeserializationResult::failed(reader.position())
            }
        }
    }

    /// Deserialize from `buffer[..end]`.
    ///
    /// An `end` past the buffer is clamped to its length.
    pub fn deserialize_bounded(&mut self, buffer: &[u8], end: usize) -> DeserializationResult {
        let end = end.min(buffer.len());
        self.deserialize(&buffer[..end])
    }

    /// Decode a replay, ignoring any trailing bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        read_replay(&mut ByteReader::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_replay(ticks: usize) -> ReplayFile {
        let mut data = ReplayData::new();
        for i in 0..ticks {
            data.record_input(i % 2 == 0, i % 3 == 0, i % 5 == 0, i % 7 == 0);
        }

        ReplayFile {
            player_name: "Ünïcødé player".to_string(),
            seed: ReplaySeed::new(12345),
            data,
            pack_id: "orthodox".to_string(),
            level_id: "pi".to_string(),
            first_play: false,
            difficulty_mult: 0.75,
            played_score: 91.125,
            ..Default::default()
        }
    }

    #[test]
    fn test_roundtrip_odd_tick_count() {
        let replay = sample_replay(7);
        let bytes = replay.to_bytes().unwrap();

        let mut parsed = ReplayFile::default();
        let result = parsed.deserialize(&bytes);

        assert!(result.success);
        assert_eq!(result.read_bytes, bytes.len());
        assert_eq!(parsed, replay);
    }

    #[test]
    fn test_roundtrip_empty() {
        let replay = ReplayFile::default();
        let bytes = replay.to_bytes().unwrap();
        let parsed = ReplayFile::from_bytes(&bytes).unwrap();

        assert_eq!(parsed.data.size(), 0);
        assert_eq!(parsed, replay);
    }

    #[test]
    fn test_padding_nibble_is_ignored() {
        let replay = sample_replay(1);
        let mut bytes = replay.to_bytes().unwrap();

        // Packed byte follows version, name, seed and tick_count
        let packed_at = 4 + 4 + replay.player_name.len() + 8 + 4;
        bytes[packed_at] |= 0xF0;

        let parsed = ReplayFile::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.data.size(), 1);
        assert_eq!(parsed, replay);
    }

    #[test]
    fn test_truncated_input_fails_without_mutation() {
        let replay = sample_replay(10);
        let bytes = replay.to_bytes().unwrap();

        let original = sample_replay(3);
        for len in 0..bytes.len() {
            let mut target = original.clone();
            let result = target.deserialize(&bytes[..len]);
            assert!(!result.success, "length {} should fail", len);
            assert_eq!(target, original);
        }
    }

    #[test]
    fn test_oversized_tick_count_fails() {
        let replay = sample_replay(4);
        let mut bytes = replay.to_bytes().unwrap();

        let count_at = 4 + 4 + replay.player_name.len() + 8;
        bytes[count_at..count_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());

        assert!(matches!(
            ReplayFile::from_bytes(&bytes),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_invalid_first_play_fails() {
        let replay = sample_replay(2);
        let mut bytes = replay.to_bytes().unwrap();
        let n = bytes.len();
        bytes[n - 13] = 2;

        assert_eq!(
            ReplayFile::from_bytes(&bytes).unwrap_err(),
            CodecError::InvalidBool(2)
        );
    }

    #[test]
    fn test_future_version_rejected() {
        let replay = sample_replay(2);
        let mut bytes = replay.to_bytes().unwrap();
        bytes[0..4].copy_from_slice(&(REPLAY_FORMAT_VERSION + 1).to_le_bytes());

        let mut target = ReplayFile::default();
        let result = target.deserialize(&bytes);
        assert!(!result.success);
        assert_eq!(target, ReplayFile::default());
    }

    #[test]
    fn test_deserialize_bounded_clamps_end() {
        let replay = sample_replay(9);
        let bytes = replay.to_bytes().unwrap();

        let mut plain = ReplayFile::default();
        let mut bounded = ReplayFile::default();
        let expected = plain.deserialize(&bytes);
        let result = bounded.deserialize_bounded(&bytes, bytes.len() + 100);

        assert_eq!(result, expected);
        assert_eq!(bounded, plain);
        assert_eq!(bounded, replay);
    }

    #[test]
    fn test_invalid_utf8_name_rejected() {
        let mut bytes = sample_replay(0).to_bytes().unwrap();
        bytes[8] = 0xFF;

        assert!(matches!(
            ReplayFile::from_bytes(&bytes),
            Err(CodecError::InvalidUtf8 {
                field: "player_name"
            })
        ));
    }

    #[test]
    fn test_trailing_bytes_are_not_consumed() {
        let replay = sample_replay(5);
        let mut bytes = replay.to_bytes().unwrap();
        let size = bytes.len();
        bytes.extend_from_slice(&[0xAA; 8]);

        let mut parsed = ReplayFile::default();
        let result = parsed.deserialize(&bytes);
        assert!(result.success);
        assert_eq!(result.read_bytes, size);

        let mut bounded = ReplayFile::default();
        assert!(bounded.deserialize_bounded(&bytes, size).success);
        assert!(!bounded.deserialize_bounded(&bytes, size - 1).success);
        assert_eq!(bounded, replay);
    }
}
