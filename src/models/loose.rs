//! Tolerant deserializers for stored records.
//!
//! Stored documents were written by hand and by several client versions:
//! text fields may be null or numeric, seat counts may be strings, and a
//! session list may be missing or not a list at all. These helpers read
//! such values the way the editors meant them instead of rejecting the
//! whole record.
//!
//! | Stored value | Text | Seat count |
//! |--------------|------|-----------|
//! | string | as is | parsed, else 0 |
//! | number | decimal text | truncated, clamped to ≥ 0 |
//! | bool | "true" / "false" | 0 |
//! | null / missing | "" (or `None`) | `None` |
//! | object / array | "" (or `None`) | 0 |
//!
//! Text is kept as stored; trimming happens at hydration.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::RawSession;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Int(i) => Some(i.to_string()),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Other(_) => None,
        }
    }

    fn into_seats(self) -> u32 {
        let n = match self {
            Scalar::Int(i) => i as f64,
            Scalar::Float(f) => f,
            Scalar::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Scalar::Bool(_) | Scalar::Other(_) => 0.0,
        };
        clamp_seats(n)
    }
}

fn clamp_seats(n: f64) -> u32 {
    if n.is_finite() && n > 0.0 {
        n.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Text field; null and non-scalar values read as "".
pub(crate) fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_text(deserializer)?.unwrap_or_default())
}

/// Optional text field; null and non-scalar values read as `None`.
pub(crate) fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text))
}

/// Seat count; `None` only for null, so callers can fall back to a legacy key.
pub(crate) fn de_opt_seat_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_seats))
}

/// Flag; `None` for null, otherwise the value's truthiness (zero, NaN and
/// "" are false; objects and arrays are true).
pub(crate) fn de_opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|v| match v {
        Scalar::Bool(b) => b,
        Scalar::Int(i) => i != 0,
        Scalar::Float(f) => f != 0.0 && !f.is_nan(),
        Scalar::Text(s) => !s.is_empty(),
        Scalar::Other(_) => true,
    }))
}

/// Session list; a non-list reads as empty and a non-object entry as an
/// empty session, which normalization then rejects.
pub(crate) fn de_sessions<'de, D>(deserializer: D) -> Result<Vec<RawSession>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Session(RawSession),
        Other(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Entries(Vec<Entry>),
        Other(IgnoredAny),
    }

    let entries = match Option::<List>::deserialize(deserializer)? {
        Some(List::Entries(entries)) => entries,
        Some(List::Other(_)) | None => Vec::new(),
    };
    Ok(entries
        .into_iter()
        .map(|e| match e {
            Entry::Session(s) => s,
            Entry::Other(_) => RawSession::default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "de_text")]
        text: String,
        #[serde(default, deserialize_with = "de_opt_seat_count")]
        seats: Option<u32>,
        #[serde(default, deserialize_with = "de_opt_flag")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "de_sessions")]
        sessions: Vec<RawSession>,
    }

    fn read(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_values() {
        assert_eq!(read(r#"{"text": "Piano"}"#).text, "Piano");
        assert_eq!(read(r#"{"text": null}"#).text, "");
        assert_eq!(read(r#"{"text": 12}"#).text, "12");
        assert_eq!(read(r#"{"text": 1.5}"#).text, "1.5");
        assert_eq!(read(r#"{"text": true}"#).text, "true");
        assert_eq!(read(r#"{"text": {"a": 1}}"#).text, "");
        assert_eq!(read("{}").text, "");
    }

    #[test]
    fn test_seat_values() {
        assert_eq!(read(r#"{"seats": "12"}"#).seats, Some(12));
        assert_eq!(read(r#"{"seats": 7.9}"#).seats, Some(7));
        assert_eq!(read(r#"{"seats": -3}"#).seats, Some(0));
        assert_eq!(read(r#"{"seats": "muchos"}"#).seats, Some(0));
        assert_eq!(read(r#"{"seats": null}"#).seats, None);
        assert_eq!(read("{}").seats, None);
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(read(r#"{"flag": false}"#).flag, Some(false));
        assert_eq!(read(r#"{"flag": 0}"#).flag, Some(false));
        assert_eq!(read(r#"{"flag": ""}"#).flag, Some(false));
        assert_eq!(read(r#"{"flag": "no"}"#).flag, Some(true));
        assert_eq!(read(r#"{"flag": 1}"#).flag, Some(true));
        assert_eq!(read(r#"{"flag": null}"#).flag, None);
    }

    #[test]
    fn test_session_lists() {
        assert!(read(r#"{"sessions": null}"#).sessions.is_empty());
        assert!(read(r#"{"sessions": "Lunes 16:00"}"#).sessions.is_empty());
        assert!(read(r#"{"sessions": {"day": "Lunes"}}"#).sessions.is_empty());

        let p = read(r#"{"sessions": [{"day": "Lunes", "time": 16, "room": 1}, 42]}"#);
        assert_eq!(p.sessions.len(), 2);
        assert_eq!(p.sessions[0].time.as_deref(), Some("16"));
        assert_eq!(p.sessions[0].room.as_deref(), Some("1"));
        assert_eq!(p.sessions[1], RawSession::default());
    }
}
