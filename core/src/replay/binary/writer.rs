//! Binary replay format writer
//!
//! Encodes a [`ReplayFile`] into a caller-sized buffer.

use super::cursor::ByteWriter;
use super::SerializationResult;
use crate::replay::error::CodecError;
use crate::replay::types::*;

/// Exact number of bytes [`write_replay`] produces for `replay`
pub fn serialized_size(replay: &ReplayFile) -> usize {
    4 // version
        + 4 + replay.player_name.len()
        + 8 // seed
        + 4 + packed_len(replay.data.size())
        + 4 + replay.pack_id.len()
        + 4 + replay.level_id.len()
        + 1 // first_play
        + 4 // difficulty_mult
        + 8 // played_score
}

/// Bytes needed to pack `ticks` inputs two per byte
pub fn packed_len(ticks: usize) -> usize {
    ticks.div_ceil(2)
}

/// Reject layout versions this build cannot read back
pub(super) fn check_version(version: u32) -> Result<(), CodecError> {
    if version > REPLAY_FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            max: REPLAY_FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Write a complete replay through `writer`
pub fn write_replay(writer: &mut ByteWriter<'_>, replay: &ReplayFile) -> Result<(), CodecError> {
    check_version(replay.version)?;
    writer.write_u32(replay.version)?;
    writer.write_prefixed("player_name", replay.player_name.as_bytes())?;
    writer.write_u64(replay.seed.get())?;
    write_inputs(writer, &replay.data)?;
    writer.write_prefixed("pack_id", replay.pack_id.as_bytes())?;
    writer.write_prefixed("level_id", replay.level_id.as_bytes())?;
    writer.write_u8(replay.first_play as u8)?;
    writer.write_f32(replay.difficulty_mult)?;
    writer.write_f64(replay.played_score)?;
    Ok(())
}

/// Write the tick count and the nibble-packed input stream
fn write_inputs(writer: &mut ByteWriter<'_>, data: &ReplayData) -> Result<(), CodecError> {
    let tick_count = u32::try_from(data.size()).map_err(|_| CodecError::LengthOverflow {
        field: "data",
        len: data.size(),
    })?;

    let needed = 4 + packed_len(data.size());
    let remaining = writer.remaining();
    if needed > remaining {
        return Err(CodecError::BufferTooSmall { needed, remaining });
    }

    writer.write_u32(tick_count)?;
    // Even tick in the low nibble, odd tick in the high nibble
    for pair in data.as_slice().chunks(2) {
        let low = pair[0].to_nibble();
        let high = pair.get(1).map_or(0, |input| input.to_nibble());
        writer.write_u8(low | (high << 4))?;
    }
    Ok(())
}

impl ReplayFile {
    /// Exact size of the serialized form
    pub fn serialized_size(&self) -> usize {
        serialized_size(self)
    }

    /// Serialize into `buffer`.
    ///
    /// On failure `written_bytes` reports how far the writer got; nothing is
    /// written past the end of `buffer`.
    pub fn serialize(&self, buffer: &mut [u8]) -> SerializationResult {
        let mut writer = ByteWriter::new(buffer);
        match write_replay(&mut writer, self) {
            Ok(()) => SerializationResult::ok(writer.position()),
            Err(e) => {
                tracing::debug!("Replay serialization failed: {}", e);
                SerializationResult::failed(writer.position())
            }
        }
    }

    /// Serialize into `buffer[..end]`.
    ///
    /// An `end` past the buffer is clamped to its length.
    pub fn serialize_bounded(&self, buffer: &mut [u8], end: usize) -> SerializationResult {
        let end = end.min(buffer.len());
        self.serialize(&mut buffer[..end])
    }

    /// Serialize into a freshly allocated, exactly sized buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buffer = vec![0u8; self.serialized_size()];
        let mut writer = ByteWriter::new(&mut buffer);
        write_replay(&mut writer, self)?;
        debug_assert_eq!(writer.position(), buffer.len());
        Ok(buffer)
    }
}
