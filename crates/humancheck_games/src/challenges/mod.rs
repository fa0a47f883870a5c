//! Peripheral verification challenges.
//!
//! Each challenge is a small pure state machine with the same
//! verdict-and-reset discipline as the board judge. The set of available
//! challenges is a static registry; nothing is fetched or generated at
//! runtime.

pub mod captcha;
pub mod quiz;
pub mod reflex;

pub use captcha::Captcha;
pub use quiz::{Question, QuestionKind, Quiz, QuizOutcome, QuizStatus};
pub use reflex::{ClickOutcome, MotionPattern, Point, ReflexGame};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Kind of verification challenge offered to a caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChallengeKind {
    /// 4×4 tic-tac-toe judged move-by-move by the oracle.
    Board,
    /// Staged quiz ending in the honeypot question.
    Quiz,
    /// Distorted-string captcha.
    Captcha,
    /// Click-the-pattern reflex game.
    Reflex,
}

/// Static description of a challenge, served to rendering callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChallengeDescriptor {
    /// The challenge this describes.
    pub kind: ChallengeKind,
    /// Title shown above the widget.
    pub title: &'static str,
    /// One-line player instructions.
    pub instructions: &'static str,
}

impl ChallengeKind {
    /// Static descriptor for this challenge kind.
    pub fn descriptor(self) -> ChallengeDescriptor {
        match self {
            ChallengeKind::Board => ChallengeDescriptor {
                kind: self,
                title: "a fun game",
                instructions: "To verify you're real, please play a game of \
                               Tic-tac-toe. Player X goes first, followed by \
                               Player O.",
            },
            ChallengeKind::Quiz => ChallengeDescriptor {
                kind: self,
                title: "Security Check",
                instructions: "Answer each question before the timer runs out.",
            },
            ChallengeKind::Captcha => ChallengeDescriptor {
                kind: self,
                title: "Captcha",
                instructions: "Enter the characters exactly as shown.",
            },
            ChallengeKind::Reflex => ChallengeDescriptor {
                kind: self,
                title: "Catch the pattern",
                instructions: "Click when you see the Spiral Chaos pattern! \
                               Click during any other pattern and you lose.",
            },
        }
    }
}

/// Every challenge this build offers, in registry order.
pub fn registry() -> Vec<ChallengeDescriptor> {
    ChallengeKind::iter().map(ChallengeKind::descriptor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_every_kind() {
        let entries = registry();
        assert_eq!(entries.len(), 4);
        for kind in ChallengeKind::iter() {
            assert!(entries.iter().any(|d| d.kind == kind));
        }
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ChallengeKind::Reflex).unwrap();
        assert_eq!(json, "\"reflex\"");
    }
}
