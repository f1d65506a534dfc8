//! Networking boundary for replays
//!
//! - [`packet`] - Framed message container carrying one replay per entry
//!
//! Sockets and sessions live outside this crate; callers move the bytes
//! from [`Packet::to_bytes`] over whatever transport they own.

pub mod packet;

pub use packet::{PACKET_HEADER_SIZE, PACKET_MAGIC, PACKET_VERSION, Packet, PacketError};
