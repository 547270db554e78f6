//! Heuristic area ("tone") classification of groups.
//!
//! A group's area is derived from its class and focus text. Rules are
//! evaluated in a fixed priority order and the first rule with a matching
//! keyword wins; text matching no rule is music.
//!
//! | Priority | Area | Keywords (folded) |
//! |----------|------|-------------------|
//! | 1 | Dance | danza, ballet, hip hop, baile |
//! | 2 | Theater | teatro, actu, escena |
//! | 3 | Arts | arte, plastica, pint, dibu |
//! | — | Music | (default) |
//!
//! Keyword lists change only together with [`TONE_KEYWORDS_VERSION`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canon::fold;

/// Version tag of the keyword tables below.
pub const TONE_KEYWORDS_VERSION: &str = "tone-keywords.v1";

/// Dance keywords.
pub const DANCE_KEYWORDS: &[&str] = &["danza", "ballet", "hip hop", "baile"];

/// Theater keywords.
pub const THEATER_KEYWORDS: &[&str] = &["teatro", "actu", "escena"];

/// Visual arts keywords.
pub const ARTS_KEYWORDS: &[&str] = &["arte", "plastica", "pint", "dibu"];

/// Rules in priority order.
pub const TONE_RULES: &[(&[&str], Tone)] = &[
    (DANCE_KEYWORDS, Tone::Dance),
    (THEATER_KEYWORDS, Tone::Theater),
    (ARTS_KEYWORDS, Tone::Arts),
];

/// Area of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Music,
    Dance,
    Theater,
    Arts,
}

impl Tone {
    /// All areas, music first.
    pub const ALL: [Tone; 4] = [Tone::Music, Tone::Dance, Tone::Theater, Tone::Arts];

    /// Stable key ("music", "dance", ...).
    pub fn key(self) -> &'static str {
        match self {
            Tone::Music => "music",
            Tone::Dance => "dance",
            Tone::Theater => "theater",
            Tone::Arts => "arts",
        }
    }

    /// Localized label.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Music => "Música",
            Tone::Dance => "Danza",
            Tone::Theater => "Teatro",
            Tone::Arts => "Artes",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies already-folded text.
pub fn classify_folded(text: &str) -> Tone {
    TONE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|&(_, tone)| tone)
        .unwrap_or_default()
}

/// Classifies a group from its class and focus text.
pub fn classify(clase: &str, enfoque: &str) -> Tone {
    classify_folded(&fold(&format!("{clase} {enfoque}")))
}
