//! Verification judge: the turn state machine that decides whether a
//! human player's moves pass the optimality check.
//!
//! A move only fails verification when a tier-1/tier-2 move existed and
//! the human played something else. Non-forced positions accept any legal
//! move, even ones a stronger player would avoid.

use crate::board::{Board, MoveError, Player};
use crate::oracle;
use crate::rules::{self, LineSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Phase of a verification game.
///
/// `AwaitingOracle` is a real, inspectable state: the human has moved and
/// the oracle's reply is pending. Any presentation delay before the reply
/// belongs to the caller, not to the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the human side to move.
    AwaitingHuman,
    /// Human has moved; the oracle's reply is pending.
    AwaitingOracle,
    /// A side completed a line.
    Won(Player),
    /// Board full with no winner.
    Draw,
    /// Human diverged from a forced move; verification rejected.
    Failed,
}

impl Phase {
    /// True for `Won`, `Draw`, and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won(_) | Phase::Draw | Phase::Failed)
    }
}

/// Outcome classification emitted after each accepted move.
///
/// `Fail` is a domain outcome (a verification rejection), distinct from
/// losing the game and from malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The game continues.
    Continue,
    /// A side completed a line.
    Win(Player),
    /// Board full with no winner.
    Draw,
    /// Non-optimal move while a forced move was available.
    Fail,
}

/// Judges one verification game on an N×N board.
///
/// Owns the board for the session's lifetime. The human side moves first;
/// turns are strictly sequential, so a human move is rejected while the
/// oracle's reply is pending.
#[derive(Debug, Clone)]
pub struct Judge {
    board: Board,
    lines: LineSet,
    human: Player,
    phase: Phase,
}

impl Judge {
    /// Creates a judge over an empty `size`×`size` board.
    #[instrument]
    pub fn new(size: usize, human: Player) -> Self {
        info!(size, ?human, "starting verification game");
        Self {
            board: Board::new(size),
            lines: LineSet::new(size),
            human,
            phase: Phase::AwaitingHuman,
        }
    }

    /// Read-only board snapshot for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The human-controlled side.
    pub fn human_side(&self) -> Player {
        self.human
    }

    /// The oracle-controlled side.
    pub fn oracle_side(&self) -> Player {
        self.human.opponent()
    }

    /// Whether verification concluded, and how.
    ///
    /// `None` while the game is in play. A human win and a draw verify;
    /// an oracle win and a failed optimality check do not.
    pub fn verified(&self) -> Option<bool> {
        match self.phase {
            Phase::AwaitingHuman | Phase::AwaitingOracle => None,
            Phase::Won(side) => Some(side == self.human),
            Phase::Draw => Some(true),
            Phase::Failed => Some(false),
        }
    }

    /// Submits the human move at `index`.
    ///
    /// The forced move is computed from the position before the move is
    /// applied. Diverging from it records the move and fails verification
    /// with no oracle reply; otherwise the move is applied and the game
    /// advances to a terminal phase or to `AwaitingOracle`.
    #[instrument(skip(self))]
    pub fn submit_human_move(&mut self, index: usize) -> Result<Verdict, MoveError> {
        match self.phase {
            Phase::AwaitingHuman => {}
            Phase::AwaitingOracle => {
                warn!(index, "human move while the oracle reply is pending");
                return Err(MoveError::OutOfTurn);
            }
            _ => return Err(MoveError::Terminal),
        }
        if !self.board.is_empty(index) {
            // reject malformed input before consulting the oracle
            return match self.board.get(index) {
                None => Err(MoveError::OutOfBounds {
                    index,
                    cells: self.board.cell_count(),
                }),
                Some(_) => Err(MoveError::Occupied { index }),
            };
        }

        let forced = oracle::forced_move(&self.board, &self.lines, self.human);
        self.board.place(index, self.human)?;

        if let Some(expected) = forced
            && expected != index
        {
            info!(
                index,
                expected, "non-optimal move while a forced move was available"
            );
            self.phase = Phase::Failed;
            return Ok(Verdict::Fail);
        }

        if rules::winner(&self.board, &self.lines) == Some(self.human) {
            info!(index, "human completed a line");
            self.phase = Phase::Won(self.human);
            return Ok(Verdict::Win(self.human));
        }
        if rules::is_full(&self.board) {
            self.phase = Phase::Draw;
            return Ok(Verdict::Draw);
        }
        debug!(index, "human move accepted, oracle to reply");
        self.phase = Phase::AwaitingOracle;
        Ok(Verdict::Continue)
    }

    /// Applies the oracle's reply.
    ///
    /// Valid only while `AwaitingOracle`; the caller owns any delay
    /// between the human move and this call.
    #[instrument(skip(self))]
    pub fn oracle_reply(&mut self) -> Result<Verdict, MoveError> {
        match self.phase {
            Phase::AwaitingOracle => {}
            Phase::AwaitingHuman => return Err(MoveError::OutOfTurn),
            _ => return Err(MoveError::Terminal),
        }
        let side = self.oracle_side();
        let Some(index) = oracle::best_move(&self.board, &self.lines, side) else {
            // a full board already drew in the human-move transition
            self.phase = Phase::Draw;
            return Ok(Verdict::Draw);
        };
        self.board.place(index, side)?;

        if rules::winner(&self.board, &self.lines) == Some(side) {
            info!(index, "oracle completed a line");
            self.phase = Phase::Won(side);
            return Ok(Verdict::Win(side));
        }
        if rules::is_full(&self.board) {
            self.phase = Phase::Draw;
            return Ok(Verdict::Draw);
        }
        debug!(index, "oracle move applied");
        self.phase = Phase::AwaitingHuman;
        Ok(Verdict::Continue)
    }

    /// Clears the board and restores the opening phase.
    ///
    /// The judge itself accepts a reset in any phase; whether to offer one
    /// mid-game is the caller's policy.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(phase = ?self.phase, "resetting verification game");
        self.board.clear();
        self.phase = Phase::AwaitingHuman;
    }
}
