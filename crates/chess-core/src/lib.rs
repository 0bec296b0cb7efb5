pub mod classify;
pub mod lichess_game;
pub mod summary;
pub mod time_window;

pub use classify::{classify_game, classify_games, ClassifiedGame, Outcome};
pub use lichess_game::{NdjsonDecoder, RawGame};
pub use summary::DailySummary;
pub use time_window::{TimeWindow, REPORT_TIMEZONE};
