//! Convert between raw and compressed replays

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use hexreplay_core::replay::{
    CompressedReplayFile, ReplayFile, try_compress_replay_file, try_decompress_replay_file,
};

/// `run.ohr` -> `run.ohr.z`
fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".z");
    PathBuf::from(name)
}

/// `run.ohr.z` -> `run.ohr` (suffix matched case-insensitively); anything
/// else gets `.ohr` appended
fn raw_path(input: &Path) -> PathBuf {
    let stripped = input.to_str().and_then(|s| {
        let cut = s.len().checked_sub(2)?;
        s.get(cut..)
            .filter(|suffix| suffix.eq_ignore_ascii_case(".z"))
            .map(|_| &s[..cut])
    });
    match stripped {
        Some(stripped) => PathBuf::from(stripped),
        None => {
            let mut name = input.as_os_str().to_owned();
            name.push(".ohr");
            PathBuf::from(name)
        }
    }
}

pub fn compress(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| compressed_path(input));

    let replay = ReplayFile::try_deserialize_from_file(input)
        .with_context(|| format!("Failed to read raw replay: {}", input.display()))?;
    let compressed = try_compress_replay_file(&replay).context("Failed to compress replay")?;
    compressed
        .try_serialize_to_file(&output)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    tracing::info!(
        "Compressed {} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        replay.serialized_size(),
        compressed.len()
    );
    Ok(())
}

pub fn decompress(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| raw_path(input));

    let compressed = CompressedReplayFile::try_deserialize_from_file(input)
        .with_context(|| format!("Failed to read compressed replay: {}", input.display()))?;
    let replay = try_decompress_replay_file(&compressed).context("Failed to decompress replay")?;
    replay
        .try_serialize_to_file(&output)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    tracing::info!(
        "Decompressed {} -> {} ({} ticks)",
        input.display(),
        output.display(),
        replay.data.size()
    );
    Ok(())
}
