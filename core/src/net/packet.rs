//! Replay network packets
//!
//! A packet is an ordered list of length-prefixed byte entries. One replay
//! (raw or compressed) occupies exactly one entry.
//!
//! # Wire Format
//!
//! ```text
//! [HXRP][version:u16][length:u32][payload...]
//! payload = ([len:u32][bytes...])*
//! ```

use byteorder::{ByteOrder, LittleEndian};

/// Packet magic bytes
pub const PACKET_MAGIC: [u8; 4] = *b"HXRP";

/// Current packet framing version
pub const PACKET_VERSION: u16 = 1;

/// Header size: magic (4) + version (2) + length (4)
pub const PACKET_HEADER_SIZE: usize = 10;

/// Message container for replay transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    payload: Vec<u8>,
    read_pos: usize,
}

impl Packet {
    /// Create an empty packet
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one length-prefixed entry.
    ///
    /// Fails if the entry or the resulting payload would overflow a u32 length.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        let len = u32::try_from(bytes.len()).map_err(|_| PacketError::EntryTooLarge(bytes.len()))?;
        check_payload_len(self.payload.len(), bytes.len())?;
        self.payload.reserve(4 + bytes.len());
        self.payload.extend_from_slice(&len.to_le_bytes());
        self.payload.extend_from_slice(bytes);
        Ok(())
    }

    /// Extract the next entry.
    ///
    /// The read position only moves when a whole entry is available.
    pub fn extract_bytes(&mut self) -> Result<Vec<u8>, PacketError> {
        let rest = &self.payload[self.read_pos..];
        if rest.is_empty() {
            return Err(PacketError::Exhausted);
        }
        if rest.len() < 4 {
            return Err(PacketError::IncompletePayload {
                expected: 4,
                got: rest.len(),
            });
        }

        let len = LittleEndian::read_u32(&rest[..4]) as usize;
        let body = &rest[4..];
        if body.len() < len {
            return Err(PacketError::IncompletePayload {
                expected: len,
                got: body.len(),
            });
        }

        let entry = body[..len].to_vec();
        self.read_pos += 4 + len;
        Ok(entry)
    }

    /// Check if every entry has been extracted
    pub fn is_exhausted(&self) -> bool {
        self.read_pos >= self.payload.len()
    }

    /// Raw payload (without framing)
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize packet to bytes with framing
    ///
    /// Returns wire format: [HXRP][version:u16][length:u32][payload...]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PACKET_HEADER_SIZE + self.payload.len());

        // Magic
        bytes.extend_from_slice(&PACKET_MAGIC);
        // Version
        bytes.extend_from_slice(&PACKET_VERSION.to_le_bytes());
        // Length (bounded by append_bytes)
        bytes.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        // Payload
        bytes.extend_from_slice(&self.payload);

        bytes
    }

    /// Deserialize packet from framed bytes
    ///
    /// Validates magic, version, and length. The returned packet reads from
    /// its first entry.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < PACKET_HEADER_SIZE {
            return Err(PacketError::TooShort);
        }

        if bytes[0..4] != PACKET_MAGIC {
            return Err(PacketError::InvalidMagic);
        }

        let version = LittleEndian::read_u16(&bytes[4..6]);
        if version != PACKET_VERSION {
            return Err(PacketError::VersionMismatch {
                expected: PACKET_VERSION,
                got: version,
            });
        }

        let length = LittleEndian::read_u32(&bytes[6..10]) as usize;
        let available = bytes.len() - PACKET_HEADER_SIZE;
        if available < length {
            return Err(PacketError::IncompletePayload {
                expected: length,
                got: available,
            });
        }

        Ok(Self {
            payload: bytes[PACKET_HEADER_SIZE..PACKET_HEADER_SIZE + length].to_vec(),
            read_pos: 0,
        })
    }
}

/// Ensure appending an entry keeps the payload length within a u32
fn check_payload_len(current: usize, entry: usize) -> Result<(), PacketError> {
    let total = current.saturating_add(4).saturating_add(entry);
    if total > u32::MAX as usize {
        return Err(PacketError::PayloadTooLarge(total));
    }
    Ok(())
}

/// Errors that can occur when building or reading packets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// Message too short for header
    TooShort,
    /// Invalid magic bytes
    InvalidMagic,
    /// Framing version mismatch
    VersionMismatch { expected: u16, got: u16 },
    /// Payload or entry incomplete
    IncompletePayload { expected: usize, got: usize },
    /// No entries left to extract
    Exhausted,
    /// Entry does not fit a u32 length prefix
    EntryTooLarge(usize),
    /// Payload would not fit the u32 length in the header
    PayloadTooLarge(usize),
}

impl std::fmt::Display for PacketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(f, "Packet too short for header"),
            Self::InvalidMagic => write!(f, "Invalid packet magic bytes"),
            Self::VersionMismatch { expected, got } => {
                write!(f, "Packet version mismatch: expected {}, got {}", expected, got)
            }
            Self::IncompletePayload { expected, got } => {
                write!(f, "Incomplete payload: expected {} bytes, got {}", expected, got)
            }
            Self::Exhausted => write!(f, "No entries left in packet"),
            Self::EntryTooLarge(len) => write!(f, "Packet entry too large: {} bytes", len),
            Self::PayloadTooLarge(len) => write!(f, "Packet payload too large: {} bytes", len),
        }
    }
}

impl std::error::Error for PacketError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_roundtrip_in_order() {
        let mut packet = Packet::new();
        packet.append_bytes(b"first").unwrap();
        packet.append_bytes(&[]).unwrap();
        packet.append_bytes(&[1, 2, 3]).unwrap();

        let mut received = Packet::from_bytes(&packet.to_bytes()).unwrap();
        assert_eq!(received.extract_bytes().unwrap(), b"first");
        assert_eq!(received.extract_bytes().unwrap(), Vec::<u8>::new());
        assert_eq!(received.extract_bytes().unwrap(), vec![1, 2, 3]);
        assert!(received.is_exhausted());
        assert_eq!(received.extract_bytes(), Err(PacketError::Exhausted));
    }

    #[test]
    fn test_framing_header() {
        let mut packet = Packet::new();
        packet.append_bytes(&[9]).unwrap();
        let bytes = packet.to_bytes();

        assert_eq!(&bytes[0..4], b"HXRP");
        assert_eq!(&bytes[4..6], &PACKET_VERSION.to_le_bytes());
        assert_eq!(&bytes[6..10], &5u32.to_le_bytes());
        assert_eq!(bytes.len(), PACKET_HEADER_SIZE + 5);
    }

    #[test]
    fn test_from_bytes_errors() {
        assert_eq!(Packet::from_bytes(&[0; 4]), Err(PacketError::TooShort));

        let mut bytes = Packet::new().to_bytes();
        bytes[0] = b'X';
        assert_eq!(Packet::from_bytes(&bytes), Err(PacketError::InvalidMagic));

        let mut bytes = Packet::new().to_bytes();
        bytes[4] = 9;
        assert_eq!(
            Packet::from_bytes(&bytes),
            Err(PacketError::VersionMismatch {
                expected: PACKET_VERSION,
                got: 9
            })
        );

        let mut packet = Packet::new();
        packet.append_bytes(&[1, 2, 3, 4]).unwrap();
        let bytes = packet.to_bytes();
        assert_eq!(
            Packet::from_bytes(&bytes[..bytes.len() - 1]),
            Err(PacketError::IncompletePayload {
                expected: 8,
                got: 7
            })
        );
    }

    #[test]
    fn test_payload_length_limit() {
        let max = u32::MAX as usize;
        assert_eq!(check_payload_len(0, 0), Ok(()));
        assert_eq!(check_payload_len(max - 4 - 10, 10), Ok(()));
        assert_eq!(
            check_payload_len(max - 4 - 10, 11),
            Err(PacketError::PayloadTooLarge(max + 1))
        );
        assert_eq!(
            check_payload_len(usize::MAX, 1),
            Err(PacketError::PayloadTooLarge(usize::MAX))
        );
    }

    #[test]
    fn test_truncated_entry_keeps_read_position() {
        // Entry claims 10 bytes, only 2 follow
        let mut payload = 10u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&[1, 2]);
        let mut bytes = PACKET_MAGIC.to_vec();
        bytes.extend_from_slice(&PACKET_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);

        let mut packet = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(
            packet.extract_bytes(),
            Err(PacketError::IncompletePayload {
                expected: 10,
                got: 2
            })
        );
        assert!(!packet.is_exhausted());
    }
}
