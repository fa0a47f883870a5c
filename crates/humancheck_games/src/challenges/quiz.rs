//! Staged quiz challenge ending in a honeypot question.
//!
//! Two answerable questions gate a third that has no answer: a
//! pseudo-mathematical prompt designed so that attempting it at all marks
//! the respondent as automated. Leaving it blank, or admitting it looks
//! impossible, passes.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// How a stage grades an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionKind {
    /// Numeric sequence continuation, graded by exact match.
    Pattern,
    /// Anagram, graded case-insensitively.
    Word,
    /// Unanswerable trap; any attempt fails.
    Honeypot,
}

/// A single quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Grading rule for this stage.
    pub kind: QuestionKind,
    /// Prompt shown to the player.
    pub prompt: &'static str,
}

const QUESTIONS: [Question; 3] = [
    Question {
        kind: QuestionKind::Pattern,
        prompt: "What comes next in the pattern: 2, 4, 8, 16, __?",
    },
    Question {
        kind: QuestionKind::Word,
        prompt: "Rearrange the letters to form a color: EULB",
    },
    Question {
        kind: QuestionKind::Honeypot,
        prompt: "Calculate the recursive fibonacci sequence for the following matrix:\n\
                 [3.14159, 2.71828, 1.41421]\n\
                 Apply the golden ratio (\u{03c6}) to each element and sum the \
                 results to 8 decimal places.",
    },
];

const FEEDBACK_PASSED: &str = "Verification successful! Thank you for being honest.";
const FEEDBACK_SKIPPED: &str = "Verification successful! Thank you for your honesty.";
const FEEDBACK_AUTOMATED: &str =
    "This appears to be an automated response. Human verification failed.";
const FEEDBACK_INCORRECT: &str = "Incorrect answer. Please try again.";
const FEEDBACK_EXPIRED: &str = "Time expired! Please try again.";

/// Status of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    /// Questions remain.
    Pending,
    /// Verification succeeded.
    Passed,
    /// Verification failed.
    Failed,
}

/// Outcome of one submission, with the feedback line to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "feedback")]
pub enum QuizOutcome {
    /// Answer accepted; a later stage is now active.
    Advance,
    /// Nothing changed; the active question still awaits an answer.
    Ignored,
    /// Verification succeeded.
    Passed(&'static str),
    /// Verification failed.
    Failed(&'static str),
}

/// Three-stage quiz state machine.
///
/// Time is owned by the caller: the widget shows a countdown, and the
/// caller invokes [`Quiz::expire`] when it runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    stage: usize,
    status: QuizStatus,
    feedback: Option<&'static str>,
}

impl Quiz {
    /// Starts a fresh quiz at the first stage.
    pub fn new() -> Self {
        Self {
            stage: 0,
            status: QuizStatus::Pending,
            feedback: None,
        }
    }

    /// Zero-based index of the active stage.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Current status.
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    /// Feedback line for the last terminal transition, if any.
    pub fn feedback(&self) -> Option<&'static str> {
        self.feedback
    }

    /// The question for the active stage.
    pub fn question(&self) -> &'static Question {
        &QUESTIONS[self.stage]
    }

    /// All questions in stage order.
    pub fn questions() -> &'static [Question] {
        &QUESTIONS
    }

    /// Grades `answer` against the active stage.
    #[instrument(skip(self, answer), fields(stage = self.stage))]
    pub fn submit(&mut self, answer: &str) -> QuizOutcome {
        if self.status != QuizStatus::Pending {
            return self.settled_outcome();
        }
        match self.question().kind {
            QuestionKind::Honeypot => {
                if answer.is_empty() {
                    info!("honeypot left blank, verification passed");
                    self.pass(FEEDBACK_PASSED)
                } else {
                    info!("honeypot answered, verification failed");
                    self.fail(FEEDBACK_AUTOMATED)
                }
            }
            QuestionKind::Pattern => {
                if answer == "32" {
                    self.advance()
                } else {
                    self.fail(FEEDBACK_INCORRECT)
                }
            }
            QuestionKind::Word => {
                if answer.eq_ignore_ascii_case("blue") {
                    self.advance()
                } else {
                    self.fail(FEEDBACK_INCORRECT)
                }
            }
        }
    }

    /// Declares the active question impossible.
    ///
    /// Passes only on the honeypot stage; on answerable stages it is a
    /// no-op, matching the widget that only shows the skip button there.
    #[instrument(skip(self), fields(stage = self.stage))]
    pub fn skip(&mut self) -> QuizOutcome {
        if self.status != QuizStatus::Pending {
            return self.settled_outcome();
        }
        if self.question().kind == QuestionKind::Honeypot {
            info!("honeypot skipped, verification passed");
            self.pass(FEEDBACK_SKIPPED)
        } else {
            QuizOutcome::Ignored
        }
    }

    /// Fails the quiz because the countdown ran out.
    #[instrument(skip(self))]
    pub fn expire(&mut self) -> QuizOutcome {
        if self.status != QuizStatus::Pending {
            return self.settled_outcome();
        }
        info!(stage = self.stage, "quiz timer expired");
        self.fail(FEEDBACK_EXPIRED)
    }

    /// Restores the first stage.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn advance(&mut self) -> QuizOutcome {
        self.stage += 1;
        QuizOutcome::Advance
    }

    fn pass(&mut self, feedback: &'static str) -> QuizOutcome {
        self.status = QuizStatus::Passed;
        self.feedback = Some(feedback);
        QuizOutcome::Passed(feedback)
    }

    fn fail(&mut self, feedback: &'static str) -> QuizOutcome {
        self.status = QuizStatus::Failed;
        self.feedback = Some(feedback);
        QuizOutcome::Failed(feedback)
    }

    fn settled_outcome(&self) -> QuizOutcome {
        match self.status {
            QuizStatus::Passed => QuizOutcome::Passed(self.feedback.unwrap_or(FEEDBACK_PASSED)),
            _ => QuizOutcome::Failed(self.feedback.unwrap_or(FEEDBACK_INCORRECT)),
        }
    }
}

impl Default for Quiz {
    fn default() -> Self {
        Self::new()
    }
}
