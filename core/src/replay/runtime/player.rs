//! Replay player
//!
//! Feeds recorded inputs back into the simulation one tick at a time.

use crate::replay::types::{InputBitset, ReplayData};

/// Forward-only cursor over a recorded input stream
///
/// The player borrows the data it plays, so the stream cannot be recorded
/// into while playback is running.
#[derive(Debug, Clone)]
pub struct ReplayPlayer<'a> {
    data: &'a ReplayData,
    current_index: usize,
}

impl<'a> ReplayPlayer<'a> {
    /// Create a new player positioned at the first tick
    pub fn new(data: &'a ReplayData) -> Self {
        Self {
            data,
            current_index: 0,
        }
    }

    /// Return the input for the current tick and step forward.
    ///
    /// Once the stream is exhausted this keeps returning the all-released
    /// input without moving the cursor, so the simulation can keep ticking.
    pub fn get_current_and_move_forward(&mut self) -> InputBitset {
        match self.data.get(self.current_index) {
            Some(input) => {
                self.current_index += 1;
                input
            }
            None => InputBitset::default(),
        }
    }

    /// Check if every recorded tick has been consumed
    pub fn done(&self) -> bool {
        self.current_index >= self.data.size()
    }

    /// Rewind to the first tick
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Index of the next tick to be returned
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Ticks left before the player is done
    pub fn remaining(&self) -> usize {
        self.data.size().saturating_sub(self.current_index)
    }

    /// Get the data being played
    pub fn data(&self) -> &'a ReplayData {
        self.data
    }
}

impl Iterator for ReplayPlayer<'_> {
    type Item = InputBitset;

    /// Yields recorded ticks only; stops at the end instead of padding.
    fn next(&mut self) -> Option<InputBitset> {
        if self.done() {
            None
        } else {
            Some(self.get_current_and_move_forward())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data(ticks: usize) -> ReplayData {
        let mut data = ReplayData::new();
        for i in 0..ticks {
            data.record_input(i % 2 == 0, i % 2 == 1, i % 4 == 0, false);
        }
        data
    }

    #[test]
    fn test_player_basic() {
        let data = create_test_data(10);
        let mut player = ReplayPlayer::new(&data);

        assert!(!player.done());
        assert_eq!(player.current_index(), 0);
        assert_eq!(player.remaining(), 10);

        for i in 0..10 {
            assert!(!player.done());
            assert_eq!(player.get_current_and_move_forward(), data.at(i));
        }

        assert!(player.done());
        assert_eq!(player.remaining(), 0);
    }

    #[test]
    fn test_player_exhausted_returns_released() {
        let data = create_test_data(3);
        let mut player = ReplayPlayer::new(&data);
        for _ in 0..3 {
            player.get_current_and_move_forward();
        }

        for _ in 0..5 {
            assert_eq!(player.get_current_and_move_forward(), InputBitset::empty());
            assert_eq!(player.current_index(), 3);
            assert!(player.done());
        }
    }

    #[test]
    fn test_player_reset() {
        let data = create_test_data(4);
        let mut player = ReplayPlayer::new(&data);

        let first = player.get_current_and_move_forward();
        player.get_current_and_move_forward();
        player.reset();

        assert_eq!(player.current_index(), 0);
        assert_eq!(player.get_current_and_move_forward(), first);
        assert_eq!(data.size(), 4);
    }

    #[test]
    fn test_player_empty_data_is_done() {
        let data = ReplayData::new();
        let mut player = ReplayPlayer::new(&data);

        assert!(player.done());
        assert_eq!(player.get_current_and_move_forward(), InputBitset::default());
        assert_eq!(player.current_index(), 0);
    }

    #[test]
    fn test_player_iterator_stops_at_end() {
        let data = create_test_data(6);
        let collected: Vec<_> = ReplayPlayer::new(&data).collect();
        assert_eq!(collected, data.as_slice());
    }
}
