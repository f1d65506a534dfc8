//! File and packet transport for replays
//!
//! Raw replays (`.ohr`) carry the binary layout verbatim; compressed replays
//! (`.ohr.z`) carry the LZ4 blob verbatim. Transport never inspects the bytes
//! beyond what the matching decoder needs.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::MAX_REPLAY_BYTES;
use super::compressed::{CompressedReplayFile, try_compress_replay_file, try_decompress_replay_file};
use super::error::TransportError;
use super::types::ReplayFile;
use crate::net::packet::Packet;

/// Extension for raw replays
pub const RAW_EXTENSION: &str = "ohr";
/// Extension for compressed replays
pub const COMPRESSED_EXTENSION: &str = "ohr.z";

/// On-disk representation, chosen by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayEncoding {
    Raw,
    Compressed,
}

impl ReplayEncoding {
    /// Detect the encoding from a path's extension.
    ///
    /// Returns `None` for anything that is not `.ohr` or `.ohr.z`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".ohr.z") {
            Some(Self::Compressed)
        } else if name.ends_with(".ohr") {
            Some(Self::Raw)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Raw => RAW_EXTENSION,
            Self::Compressed => COMPRESSED_EXTENSION,
        }
    }
}

/// Read a file into memory with a size cap
fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>, TransportError> {
    let len = fs::metadata(path)?.len();
    if len > max_bytes {
        return Err(TransportError::FileTooLarge {
            len,
            max: max_bytes,
        });
    }
    Ok(fs::read(path)?)
}

/// Write through a temporary sibling file, then rename into place
fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), TransportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = match path.file_name() {
        Some(name) => {
            let mut tmp_name = OsString::from(name);
            tmp_name.push(".tmp");
            path.with_file_name(tmp_name)
        }
        None => {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "replay path has no file name",
            )));
        }
    };

    let result = write_and_rename(&tmp_path, path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    Ok(result?)
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    {
        let mut f = fs::File::create(tmp_path)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }

    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path)?;
        }
    }

    fs::rename(tmp_path, path)
}

/// Flatten a transport result into a success flag, logging the failure
fn report(action: &str, path: Option<&Path>, result: Result<(), TransportError>) -> bool {
    match result {
        Ok(()) => {
            if let Some(path) = path {
                tracing::debug!("{} {}", action, path.display());
            }
            true
        }
        Err(e) => {
            match path {
                Some(path) => tracing::warn!("Failed to {} {}: {}", action, path.display(), e),
                None => tracing::warn!("Failed to {}: {}", action, e),
            }
            false
        }
    }
}

impl ReplayFile {
    /// Write the raw layout to `path`
    pub fn try_serialize_to_file(&self, path: &Path) -> Result<(), TransportError> {
        write_file_atomic(path, &self.to_bytes()?)
    }

    /// Read the raw layout from `path`
    pub fn try_deserialize_from_file(path: &Path) -> Result<Self, TransportError> {
        let bytes = read_file_with_limit(path, MAX_REPLAY_BYTES as u64)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    pub fn serialize_to_file(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        report("write replay", Some(path), self.try_serialize_to_file(path))
    }

    /// Load from `path`, replacing `self` only on success
    pub fn deserialize_from_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = Self::try_deserialize_from_file(path).map(|replay| *self = replay);
        report("read replay", Some(path), result)
    }

    /// Append the raw layout as one packet entry
    pub fn serialize_to_packet(&self, packet: &mut Packet) -> bool {
        let result = self
            .to_bytes()
            .map_err(TransportError::from)
            .and_then(|bytes| Ok(packet.append_bytes(&bytes)?));
        report("pack replay", None, result)
    }

    /// Extract one packet entry, replacing `self` only on success.
    ///
    /// The entry is consumed even when it fails to decode.
    pub fn deserialize_from_packet(&mut self, packet: &mut Packet) -> bool {
        let result = packet
            .extract_bytes()
            .map_err(TransportError::from)
            .and_then(|bytes| Ok(Self::from_bytes(&bytes)?))
            .map(|replay| *self = replay);
        report("unpack replay", None, result)
    }
}

impl CompressedReplayFile {
    /// Write the compressed blob to `path` verbatim
    pub fn try_serialize_to_file(&self, path: &Path) -> Result<(), TransportError> {
        write_file_atomic(path, self.as_bytes())
    }

    /// Read a compressed blob from `path` verbatim
    pub fn try_deserialize_from_file(path: &Path) -> Result<Self, TransportError> {
        Ok(Self::from_raw(read_file_with_limit(path, MAX_REPLAY_BYTES as u64)?))
    }

    pub fn serialize_to_file(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        report("write compressed replay", Some(path), self.try_serialize_to_file(path))
    }

    /// Load from `path`, replacing `self` only on success
    pub fn deserialize_from_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = Self::try_deserialize_from_file(path).map(|blob| *self = blob);
        report("read compressed replay", Some(path), result)
    }

    /// Append the blob as one packet entry
    pub fn serialize_to_packet(&self, packet: &mut Packet) -> bool {
        let result = packet.append_bytes(self.as_bytes()).map_err(TransportError::from);
        report("pack compressed replay", None, result)
    }

    /// Extract one packet entry as the blob, replacing `self` on success
    pub fn deserialize_from_packet(&mut self, packet: &mut Packet) -> bool {
        let result = packet
            .extract_bytes()
            .map(|bytes| *self = Self::from_raw(bytes))
            .map_err(TransportError::from);
        report("unpack compressed replay", None, result)
    }
}

/// Save a replay, compressing when `path` ends in `.ohr.z`.
///
/// Paths with any other extension are written raw.
pub fn save_replay_to_path(replay: &ReplayFile, path: &Path) -> Result<(), TransportError> {
    match ReplayEncoding::from_path(path) {
        Some(ReplayEncoding::Compressed) => try_compress_replay_file(replay)?.try_serialize_to_file(path),
        _ => replay.try_serialize_to_file(path),
    }
}

/// Load a replay, decompressing when `path` ends in `.ohr.z`.
///
/// Paths with any other extension are read raw.
pub fn load_replay_from_path(path: &Path) -> Result<ReplayFile, TransportError> {
    match ReplayEncoding::from_path(path) {
        Some(ReplayEncoding::Compressed) => {
            let blob = CompressedReplayFile::try_deserialize_from_file(path)?;
            Ok(try_decompress_replay_file(&blob)?)
        }
        _ => ReplayFile::try_deserialize_from_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::compressed::compress_replay_file;
    use crate::replay::types::ReplaySeed;
    use std::path::PathBuf;

    fn create_test_replay() -> ReplayFile {
        let mut replay = ReplayFile {
            player_name: "vee".to_string(),
            seed: ReplaySeed::new(0xABCD),
            pack_id: "cube".to_string(),
            level_id: "hexagoner".to_string(),
            first_play: true,
            difficulty_mult: 2.0,
            played_score: 17.75,
            ..Default::default()
        };
        for i in 0..101 {
            replay.data.record_input(i % 3 == 0, i % 3 == 1, false, i > 50);
        }
        replay
    }

    #[test]
    fn test_encoding_from_path() {
        assert_eq!(
            ReplayEncoding::from_path(&PathBuf::from("a/b.ohr")),
            Some(ReplayEncoding::Raw)
        );
        assert_eq!(
            ReplayEncoding::from_path(&PathBuf::from("b.OHR.Z")),
            Some(ReplayEncoding::Compressed)
        );
        assert_eq!(ReplayEncoding::from_path(&PathBuf::from("b.txt")), None);
        assert_eq!(ReplayEncoding::Compressed.extension(), "ohr.z");
    }

    #[test]
    fn test_raw_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.ohr");
        let replay = create_test_replay();

        assert!(replay.serialize_to_file(&path));

        let mut loaded = ReplayFile::default();
        assert!(loaded.deserialize_from_file(&path));
        assert_eq!(loaded, replay);
        assert!(!dir.path().join("best.ohr.tmp").exists());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the destination makes the rename fail
        let path = dir.path().join("taken.ohr");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), [0]).unwrap();

        assert!(!create_test_replay().serialize_to_file(&path));
        assert!(!dir.path().join("taken.ohr.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_future_version_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let replay = ReplayFile {
            version: crate::replay::types::REPLAY_FORMAT_VERSION + 1,
            ..create_test_replay()
        };

        for name in ["future.ohr", "future.ohr.z"] {
            let path = dir.path().join(name);
            assert!(matches!(
                save_replay_to_path(&replay, &path),
                Err(TransportError::Codec(_) | TransportError::Compression(_))
            ));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_compressed_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("best.ohr.z");
        let replay = create_test_replay();
        let compressed = compress_replay_file(&replay).unwrap();

        assert!(compressed.serialize_to_file(&path));
        assert_eq!(std::fs::read(&path).unwrap(), compressed.as_bytes());

        let mut loaded = CompressedReplayFile::default();
        assert!(loaded.deserialize_from_file(&path));
        assert_eq!(loaded, compressed);
    }

    #[test]
    fn test_missing_file_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let replay = create_test_replay();

        let mut target = replay.clone();
        assert!(!target.deserialize_from_file(dir.path().join("missing.ohr")));
        assert_eq!(target, replay);

        let mut blob = CompressedReplayFile::from_raw(vec![1, 2, 3]);
        assert!(!blob.deserialize_from_file(dir.path().join("missing.ohr.z")));
        assert_eq!(blob.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.ohr");
        std::fs::write(&path, [1, 0, 0, 0, 200, 0, 0, 0]).unwrap();

        let mut target = ReplayFile::default();
        assert!(!target.deserialize_from_file(&path));
        assert!(matches!(
            ReplayFile::try_deserialize_from_file(&path),
            Err(TransportError::Codec(_))
        ));
    }

    #[test]
    fn test_packet_roundtrip_both_representations() {
        let replay = create_test_replay();
        let compressed = compress_replay_file(&replay).unwrap();

        let mut outgoing = Packet::new();
        assert!(replay.serialize_to_packet(&mut outgoing));
        assert!(compressed.serialize_to_packet(&mut outgoing));

        let mut incoming = Packet::from_bytes(&outgoing.to_bytes()).unwrap();
        let mut raw = ReplayFile::default();
        let mut blob = CompressedReplayFile::default();
        assert!(raw.deserialize_from_packet(&mut incoming));
        assert!(blob.deserialize_from_packet(&mut incoming));

        assert_eq!(raw, replay);
        assert_eq!(blob, compressed);
        assert!(incoming.is_exhausted());
    }

    #[test]
    fn test_empty_packet_fails() {
        let mut packet = Packet::new();
        let mut target = ReplayFile::default();
        assert!(!target.deserialize_from_packet(&mut packet));
        assert_eq!(target, ReplayFile::default());
    }

    #[test]
    fn test_save_and_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let replay = create_test_replay();

        let raw_path = dir.path().join("run.ohr");
        let compressed_path = dir.path().join("run.ohr.z");
        save_replay_to_path(&replay, &raw_path).unwrap();
        save_replay_to_path(&replay, &compressed_path).unwrap();

        assert_eq!(std::fs::read(&raw_path).unwrap(), replay.to_bytes().unwrap());
        assert_ne!(
            std::fs::read(&compressed_path).unwrap(),
            std::fs::read(&raw_path).unwrap()
        );

        assert_eq!(load_replay_from_path(&raw_path).unwrap(), replay);
        assert_eq!(load_replay_from_path(&compressed_path).unwrap(), replay);
    }
}
