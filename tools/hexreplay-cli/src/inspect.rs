//! Print replay metadata and tick streams

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use hexreplay_core::replay::{ReplayFile, ReplayPlayer, load_replay_from_path};

/// Replay metadata without the input stream
#[derive(Debug, Serialize)]
struct ReplaySummary<'a> {
    version: u32,
    player_name: &'a str,
    seed: u64,
    pack_id: &'a str,
    level_id: &'a str,
    first_play: bool,
    difficulty_mult: f32,
    played_score: f64,
    ticks: usize,
}

impl<'a> From<&'a ReplayFile> for ReplaySummary<'a> {
    fn from(replay: &'a ReplayFile) -> Self {
        Self {
            version: replay.version,
            player_name: &replay.player_name,
            seed: replay.seed.get(),
            pack_id: &replay.pack_id,
            level_id: &replay.level_id,
            first_play: replay.first_play,
            difficulty_mult: replay.difficulty_mult,
            played_score: replay.played_score,
            ticks: replay.data.size(),
        }
    }
}

fn load(path: &Path) -> Result<ReplayFile> {
    load_replay_from_path(path)
        .with_context(|| format!("Failed to load replay: {}", path.display()))
}

pub fn info(path: &Path, json: bool) -> Result<()> {
    let replay = load(path)?;
    let summary = ReplaySummary::from(&replay);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Replay: {}", path.display());
    println!("  Format version:  {}", summary.version);
    println!("  Player:          {}", summary.player_name);
    println!("  Seed:            {}", replay.seed);
    println!("  Pack:            {}", summary.pack_id);
    println!("  Level:           {}", summary.level_id);
    println!("  First play:      {}", summary.first_play);
    println!("  Difficulty:      {}", summary.difficulty_mult);
    println!("  Score:           {:.3}", summary.played_score);
    println!("  Ticks:           {}", summary.ticks);
    Ok(())
}

/// One line per tick: index, bit string, and the held signals
pub fn format_tick_lines(replay: &ReplayFile) -> Vec<String> {
    ReplayPlayer::new(&replay.data)
        .enumerate()
        .map(|(tick, input)| {
            let mut held = Vec::new();
            if input.left() {
                held.push("left");
            }
            if input.right() {
                held.push("right");
            }
            if input.swap() {
                held.push("swap");
            }
            if input.focus() {
                held.push("focus");
            }
            format!("{:>8} {} {}", tick, input.to_bit_string(), held.join("+"))
        })
        .collect()
}

pub fn dump(path: &Path) -> Result<()> {
    let replay = load(path)?;
    for line in format_tick_lines(&replay) {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tick_lines() {
        let mut replay = ReplayFile::default();
        replay.data.record_input(false, false, false, false);
        replay.data.record_input(true, false, true, false);

        let lines = format_tick_lines(&replay);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].trim_end(), "       0 0000");
        assert_eq!(lines[1], "       1 0101 left+swap");
    }

    #[test]
    fn test_summary_json() {
        let mut replay = ReplayFile {
            player_name: "vee".to_string(),
            ..Default::default()
        };
        replay.data.record_input(true, false, false, false);

        let json = serde_json::to_value(ReplaySummary::from(&replay)).unwrap();
        assert_eq!(json["player_name"], "vee");
        assert_eq!(json["ticks"], 1);
    }

    #[test]
    fn test_info_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = info(&dir.path().join("nope.ohr"), false).unwrap_err();
        assert!(err.to_string().contains("Failed to load replay"));
    }
}
