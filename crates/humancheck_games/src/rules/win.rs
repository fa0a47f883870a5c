//! Win detection.

use crate::board::{Board, Player, Square};
use crate::rules::LineSet;
use tracing::instrument;

/// Checks whether either side has completed a line.
///
/// Returns `Some(player)` when every square under some line holds the
/// same non-empty side, `None` after exhausting all lines.
#[instrument(skip(board, lines))]
pub fn winner(board: &Board, lines: &LineSet) -> Option<Player> {
    for line in lines.lines() {
        let mut squares = line.iter().map(|&i| board.get(i));
        let Some(Some(Square::Occupied(first))) = squares.next() else {
            continue;
        };
        if squares.all(|sq| sq == Some(Square::Occupied(first))) {
            return Some(first);
        }
    }
    None
}
