//! Draw detection.

use crate::board::{Board, Square};
use crate::rules::{LineSet, winner};
use tracing::instrument;

/// True when no square is empty.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|&s| s != Square::Empty)
}

/// True when the board is full and neither side completed a line.
#[instrument(skip(board, lines))]
pub fn is_draw(board: &Board, lines: &LineSet) -> bool {
    is_full(board) && winner(board, lines).is_none()
}
