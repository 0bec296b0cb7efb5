use chrono_tz::Tz;

use crate::lichess_game::RawGame;
use crate::time_window::local_hour;

/// Result of a game from the point of view of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    /// A winner is recorded but the player is on neither side.
    Other,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::Win, Outcome::Loss, Outcome::Draw, Outcome::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Draw => "draw",
            Outcome::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedGame {
    /// Local hour of day, 0-23.
    pub hour: u32,
    pub outcome: Outcome,
}

/// Classify one game for `username`, or `None` if it has no usable creation time.
pub fn classify_game(game: &RawGame, username: &str, tz: Tz) -> Option<ClassifiedGame> {
    // Zero is treated like a missing timestamp
    let created_at = game.created_at.filter(|ts| *ts != 0)?;
    let hour = local_hour(created_at, tz)?;

    let target = username.to_lowercase();
    let is_target = |name: Option<&str>| name.is_some_and(|n| n.to_lowercase() == target);
    let white = is_target(game.white_name());
    let black = is_target(game.black_name());

    let outcome = match game.winner.as_deref() {
        None => Outcome::Draw,
        Some("white") if white => Outcome::Win,
        Some("black") if black => Outcome::Win,
        Some(_) if white || black => Outcome::Loss,
        Some(winner) => {
            tracing::warn!(
                game_id = game.id.as_deref().unwrap_or(""),
                winner,
                username,
                "Game has a winner but the player is on neither side"
            );
            Outcome::Other
        }
    };

    Some(ClassifiedGame { hour, outcome })
}

/// Classify games in order, dropping those without a creation time.
pub fn classify_games(games: &[RawGame], username: &str, tz: Tz) -> Vec<ClassifiedGame> {
    games
        .iter()
        .filter_map(|g| classify_game(g, username, tz))
        .collect()
}
