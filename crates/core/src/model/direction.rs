use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::item::VocabItem;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectionError {
    #[error("unknown direction: {0}")]
    Unknown(String),
}

//
// ─── DIRECTION ─────────────────────────────────────────────────────────────────
//

/// Which language is shown as the prompt and which is expected as the answer.
///
/// The direction is held client-side; the scoring service only sees it as a
/// field of each answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// French prompt, Dutch answer.
    #[serde(rename = "fr2nl")]
    Fr2Nl,
    /// Dutch prompt, French answer.
    #[serde(rename = "nl2fr")]
    Nl2Fr,
}

impl Direction {
    /// Wire representation used by the scoring service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Fr2Nl => "fr2nl",
            Direction::Nl2Fr => "nl2fr",
        }
    }

    /// Text shown as the question prompt for `item`.
    #[must_use]
    pub fn prompt_of(self, item: &VocabItem) -> &str {
        match self {
            Direction::Fr2Nl => &item.fr,
            Direction::Nl2Fr => &item.nl,
        }
    }

    /// Text the student is expected to produce for `item`.
    #[must_use]
    pub fn expected_of(self, item: &VocabItem) -> &str {
        match self {
            Direction::Fr2Nl => &item.nl,
            Direction::Nl2Fr => &item.fr,
        }
    }

    /// The prompted (source-language) word of `item`.
    ///
    /// Progress records are keyed by this word.
    #[must_use]
    pub fn source_of(self, item: &VocabItem) -> &str {
        self.prompt_of(item)
    }

    /// The answer-side (target-language) word of `item`.
    #[must_use]
    pub fn target_of(self, item: &VocabItem) -> &str {
        self.expected_of(item)
    }

    /// Reverse the prompt/answer roles.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Fr2Nl => Direction::Nl2Fr,
            Direction::Nl2Fr => Direction::Fr2Nl,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Fr2Nl
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr2nl" => Ok(Direction::Fr2Nl),
            "nl2fr" => Ok(Direction::Nl2Fr),
            other => Err(DirectionError::Unknown(other.to_string())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordId;

    fn item() -> VocabItem {
        VocabItem::new(WordId::new(1), "chien", "hond")
    }

    #[test]
    fn fr2nl_prompts_french_and_expects_dutch() {
        let it = item();
        assert_eq!(Direction::Fr2Nl.prompt_of(&it), "chien");
        assert_eq!(Direction::Fr2Nl.expected_of(&it), "hond");
    }

    #[test]
    fn nl2fr_prompts_dutch_and_expects_french() {
        let it = item();
        assert_eq!(Direction::Nl2Fr.prompt_of(&it), "hond");
        assert_eq!(Direction::Nl2Fr.expected_of(&it), "chien");
    }

    #[test]
    fn source_word_follows_the_prompt_language() {
        let it = item();
        assert_eq!(Direction::Fr2Nl.source_of(&it), "chien");
        assert_eq!(Direction::Nl2Fr.source_of(&it), "hond");
    }

    #[test]
    fn parses_wire_strings() {
        assert_eq!("fr2nl".parse::<Direction>().unwrap(), Direction::Fr2Nl);
        assert_eq!("nl2fr".parse::<Direction>().unwrap(), Direction::Nl2Fr);
        let err = "en2fr".parse::<Direction>().unwrap_err();
        assert!(matches!(err, DirectionError::Unknown(_)));
    }

    #[test]
    fn reversed_swaps_roles() {
        assert_eq!(Direction::Fr2Nl.reversed(), Direction::Nl2Fr);
        assert_eq!(Direction::Nl2Fr.reversed(), Direction::Fr2Nl);
    }
}
