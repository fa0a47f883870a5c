//! Pure challenge logic for human-verification games.
//!
//! The centerpiece is a 4×4 tic-tac-toe variant used as an
//! "are you human" check: a fixed-heuristic move oracle plays the
//! opposing side and doubles as the reference answer, and a judge fails
//! verification the moment the human ignores a forced win or block. Around
//! it sit smaller challenges with the same verdict-and-reset discipline: a
//! staged quiz ending in a honeypot question, a captcha string, and a
//! click-the-pattern reflex game.
//!
//! # Architecture
//!
//! - **Board / rules**: N×N flat board plus the winning-line set computed
//!   once per size.
//! - **Oracle**: immediate win, else immediate block, else lowest empty
//!   square. Deliberately a fixed heuristic rather than a search; its
//!   exact choices are what verification is measured against.
//! - **Judge**: the turn state machine. `AwaitingOracle` is a real state,
//!   so any presentation delay before the oracle's reply stays outside
//!   this crate.
//! - **Challenges**: the peripheral widgets and the static registry that
//!   replaces runtime widget loading.
//!
//! Everything here is synchronous and clock-free; timers, scheduling, and
//! transport belong to the serving layer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
pub mod challenges;
mod judge;
pub mod oracle;
pub mod rules;

pub use board::{Board, MoveError, Player, Square};
pub use judge::{Judge, Phase, Verdict};
pub use rules::LineSet;
