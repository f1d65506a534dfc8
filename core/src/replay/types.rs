//! Core types for the replay system
//!
//! This module defines the in-memory representation shared by the raw
//! (`.ohr`) and compressed (`.ohr.z`) replay formats.

use serde::{Deserialize, Serialize};

/// Current replay layout version written by this build.
pub const REPLAY_FORMAT_VERSION: u32 = 1;

bitflags::bitflags! {
    /// Control state for a single simulation tick
    ///
    /// Bit positions are fixed: `LEFT` is bit 0, `RIGHT` bit 1, `SWAP` bit 2,
    /// `FOCUS` bit 3. Only the low nibble is ever used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputBitset: u8 {
        const LEFT = 0b0000_0001;
        const RIGHT = 0b0000_0010;
        const SWAP = 0b0000_0100;
        const FOCUS = 0b0000_1000;
    }
}

impl InputBitset {
    /// Build a bitset from the four signals in their fixed order.
    pub fn new(left: bool, right: bool, swap: bool, focus: bool) -> Self {
        let mut bits = Self::empty();
        bits.set(Self::LEFT, left);
        bits.set(Self::RIGHT, right);
        bits.set(Self::SWAP, swap);
        bits.set(Self::FOCUS, focus);
        bits
    }

    /// Decode a packed nibble. Bits above the low nibble are dropped.
    pub fn from_nibble(nibble: u8) -> Self {
        Self::from_bits_truncate(nibble & 0x0F)
    }

    /// The low-nibble encoding of this tick.
    pub fn to_nibble(self) -> u8 {
        self.bits()
    }

    pub fn left(self) -> bool {
        self.contains(Self::LEFT)
    }

    pub fn right(self) -> bool {
        self.contains(Self::RIGHT)
    }

    pub fn swap(self) -> bool {
        self.contains(Self::SWAP)
    }

    pub fn focus(self) -> bool {
        self.contains(Self::FOCUS)
    }

    /// Render as four characters, highest bit first (`focus swap right left`).
    pub fn to_bit_string(self) -> String {
        format!("{:04b}", self.bits())
    }
}

impl Default for InputBitset {
    fn default() -> Self {
        Self::empty()
    }
}

// Manual serde implementation for InputBitset
impl Serialize for InputBitset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InputBitset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(InputBitset::from_nibble(bits))
    }
}

/// Recorded input stream, one entry per simulation tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayData {
    inputs: Vec<InputBitset>,
}

impl ReplayData {
    /// Create a new empty input stream
    pub fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    /// Create an empty stream with room for `ticks` inputs
    pub fn with_capacity(ticks: usize) -> Self {
        Self {
            inputs: Vec::with_capacity(ticks),
        }
    }

    /// Append one tick of input
    pub fn record_input(&mut self, left: bool, right: bool, swap: bool, focus: bool) {
        self.inputs.push(InputBitset::new(left, right, swap, focus));
    }

    /// Append an already-built bitset
    pub fn push(&mut self, input: InputBitset) {
        self.inputs.push(input);
    }

    /// Number of recorded ticks
    pub fn size(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Input at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    pub fn at(&self, index: usize) -> InputBitset {
        self.inputs[index]
    }

    /// Input at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<InputBitset> {
        self.inputs.get(index).copied()
    }

    /// Iterate over all ticks in recording order
    pub fn iter(&self) -> impl Iterator<Item = InputBitset> + '_ {
        self.inputs.iter().copied()
    }

    pub fn as_slice(&self) -> &[InputBitset] {
        &self.inputs
    }
}

impl FromIterator<InputBitset> for ReplayData {
    fn from_iter<T: IntoIterator<Item = InputBitset>>(iter: T) -> Self {
        Self {
            inputs: iter.into_iter().collect(),
        }
    }
}

/// Seed for the simulation's non-input randomness
///
/// Stored and restored verbatim; the replay layer never interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplaySeed(u64);

impl ReplaySeed {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ReplaySeed {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ReplaySeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Complete replay record (in-memory representation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFile {
    /// Replay layout version, not the game version
    pub version: u32,
    pub player_name: String,
    /// Seed for all non-input randomness in the session
    pub seed: ReplaySeed,
    pub data: ReplayData,
    pub pack_id: String,
    pub level_id: String,
    /// Whether this was the player's first attempt at the level
    pub first_play: bool,
    pub difficulty_mult: f32,
    /// Survival time or a level-defined score
    pub played_score: f64,
}

impl Default for ReplayFile {
    fn default() -> Self {
        Self {
            version: REPLAY_FORMAT_VERSION,
            player_name: String::new(),
            seed: ReplaySeed::default(),
            data: ReplayData::new(),
            pack_id: String::new(),
            level_id: String::new(),
            first_play: false,
            difficulty_mult: 1.0,
            played_score: 0.0,
        }
    }
}

impl ReplayFile {
    /// Suggested file name for this replay, using the raw `.ohr` extension.
    ///
    /// Characters that are awkward in file names are replaced with `_`.
    pub fn create_filename(&self) -> String {
        format!(
            "{}_{}_{}_{:.3}.ohr",
            sanitize_component(&self.player_name),
            sanitize_component(&self.pack_id),
            sanitize_component(&self.level_id),
            self.played_score
        )
    }
}

fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
