//! Game records as exported by the Lichess games API (`application/x-ndjson`).
//!
//! Only the fields needed for daily activity charts are modelled. Every field is
//! optional at every level, and a field of the wrong JSON type is read as absent
//! rather than rejecting the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGame {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<i64>,
    /// "white" or "black"; absent for draws and unfinished games. A non-null
    /// value of another JSON type is kept as its JSON text.
    #[serde(default, deserialize_with = "winner_field")]
    pub winner: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub players: Option<Players>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Players {
    #[serde(default, deserialize_with = "lenient")]
    pub white: Option<Player>,
    #[serde(default, deserialize_with = "lenient")]
    pub black: Option<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Player {
    /// Absent for anonymous players and Stockfish opponents.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<LichessUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LichessUser {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn winner_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(side) => Some(side),
        other => Some(other.to_string()),
    })
}

impl RawGame {
    /// Decode one NDJSON line. Returns `None` for blank lines and for anything
    /// that is not a JSON object.
    pub fn from_ndjson_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::debug!("Skipping game line that is not a JSON object");
                return None;
            }
            Err(e) => {
                tracing::debug!("Skipping malformed game line: {e}");
                return None;
            }
        };
        serde_json::from_value(value).ok()
    }

    pub fn white_name(&self) -> Option<&str> {
        self.side_name(|p| p.white.as_ref())
    }

    pub fn black_name(&self) -> Option<&str> {
        self.side_name(|p| p.black.as_ref())
    }

    fn side_name<'a>(&'a self, side: impl Fn(&'a Players) -> Option<&'a Player>) -> Option<&'a str> {
        self.players
            .as_ref()
            .and_then(side)
            .and_then(|p| p.user.as_ref())
            .and_then(|u| u.name.as_deref())
    }
}

/// Incremental NDJSON splitter for a chunked response body.
///
/// Chunks may end mid-line; the tail is buffered until the next newline or
/// [`NdjsonDecoder::finish`].
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    pending: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every game completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawGame> {
        self.pending.extend_from_slice(chunk);

        let mut games = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            games.extend(decode_line(&line));
        }
        games
    }

    /// Flush a trailing line that had no terminating newline.
    pub fn finish(mut self) -> Option<RawGame> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&rest)
    }
}

fn decode_line(bytes: &[u8]) -> Option<RawGame> {
    match std::str::from_utf8(bytes) {
        Ok(line) => RawGame::from_ndjson_line(line),
        Err(e) => {
            tracing::debug!("Skipping non UTF-8 game line: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_record() {
        let line = r#"{"id":"q7ZvsdUF","rated":true,"createdAt":1735732800000,"winner":"white","players":{"white":{"user":{"name":"Alice","id":"alice"},"rating":1500},"black":{"user":{"name":"Bob","id":"bob"},"rating":1490}}}"#;

        let game = RawGame::from_ndjson_line(line).unwrap();
        assert_eq!(game.id.as_deref(), Some("q7ZvsdUF"));
        assert_eq!(game.created_at, Some(1_735_732_800_000));
        assert_eq!(game.winner.as_deref(), Some("white"));
        assert_eq!(game.white_name(), Some("Alice"));
        assert_eq!(game.black_name(), Some("Bob"));
    }

    #[test]
    fn test_missing_nested_fields() {
        let game = RawGame::from_ndjson_line(r#"{"createdAt":1,"players":{"white":{"aiLevel":3}}}"#)
            .unwrap();
        assert_eq!(game.white_name(), None);
        assert_eq!(game.black_name(), None);
        assert_eq!(game.winner, None);
    }

    #[test]
    fn test_wrong_field_types_read_as_absent() {
        let line = r#"{"createdAt":"yesterday","winner":7,"players":{"white":{"user":{"name":42}},"black":"nobody"}}"#;

        let game = RawGame::from_ndjson_line(line).unwrap();
        assert_eq!(game.created_at, None);
        assert_eq!(game.white_name(), None);
        assert!(game.players.as_ref().unwrap().black.is_none());
    }

    #[test]
    fn test_winner_of_other_type_is_still_recorded() {
        let game = RawGame::from_ndjson_line(r#"{"createdAt":1,"winner":7}"#).unwrap();
        assert_eq!(game.winner.as_deref(), Some("7"));

        let game = RawGame::from_ndjson_line(r#"{"createdAt":1,"winner":null}"#).unwrap();
        assert_eq!(game.winner, None);
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(RawGame::from_ndjson_line("").is_none());
        assert!(RawGame::from_ndjson_line("   ").is_none());
        assert!(RawGame::from_ndjson_line("{not json").is_none());
        assert!(RawGame::from_ndjson_line("[1, 2, 3]").is_none());
        assert!(RawGame::from_ndjson_line("__import__('os')").is_none());
    }

    #[test]
    fn test_decoder_handles_split_chunks() {
        let mut decoder = NdjsonDecoder::new();

        assert!(decoder.feed(br#"{"createdAt":1,"win"#).is_empty());
        let games = decoder.feed(b"ner\":\"black\"}\n{\"createdAt\":2}\n{\"created");
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].winner.as_deref(), Some("black"));
        assert_eq!(games[1].created_at, Some(2));

        assert!(decoder.feed(b"At\":3}").is_empty());
        assert_eq!(decoder.finish().unwrap().created_at, Some(3));
    }

    #[test]
    fn test_decoder_skips_malformed_lines() {
        let mut decoder = NdjsonDecoder::new();
        let body = b"{\"createdAt\":1}\r\nnot json at all\n\n\xff\xfe\n{\"createdAt\":2}\n";

        let games = decoder.feed(body);
        assert_eq!(games.len(), 2);
        assert_eq!(games[1].created_at, Some(2));
        assert!(decoder.finish().is_none());
    }
}
