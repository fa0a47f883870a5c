//! Property tests for line enumeration and the oracle's win tier.

use humancheck_games::rules::{LineSet, winner};
use humancheck_games::{Board, Player, oracle};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every board size yields N rows, N columns and 2 diagonals.
    #[test]
    fn line_count_is_2n_plus_2(size in 1usize..=9) {
        let set = LineSet::new(size);
        prop_assert_eq!(set.lines().len(), 2 * size + 2);
    }

    /// Every line holds exactly N in-range indices with no repeats.
    #[test]
    fn lines_are_full_length_and_in_range(size in 1usize..=9) {
        let set = LineSet::new(size);
        for line in set.lines() {
            prop_assert_eq!(line.len(), size);
            let unique: HashSet<_> = line.iter().collect();
            prop_assert_eq!(unique.len(), size);
            prop_assert!(line.iter().all(|&i| i < size * size));
        }
    }

    /// No two lines cover the same index set.
    #[test]
    fn lines_are_pairwise_distinct(size in 2usize..=9) {
        let set = LineSet::new(size);
        let mut seen = HashSet::new();
        for line in set.lines() {
            let key: Vec<usize> = {
                let mut sorted = line.clone();
                sorted.sort_unstable();
                sorted
            };
            prop_assert!(seen.insert(key), "duplicate line in {}x{} set", size, size);
        }
    }

    /// Rows and columns jointly cover every square exactly twice.
    #[test]
    fn rows_and_columns_cover_the_board(size in 1usize..=9) {
        let set = LineSet::new(size);
        let mut coverage = vec![0usize; size * size];
        for line in set.lines().iter().take(2 * size) {
            for &i in line {
                coverage[i] += 1;
            }
        }
        prop_assert!(coverage.iter().all(|&c| c == 2));
    }

    /// Whenever the win tier fires, playing its move wins immediately.
    #[test]
    fn win_tier_moves_actually_win(
        marks in proptest::collection::vec(proptest::option::of(prop_oneof![Just(Player::X), Just(Player::O)]), 16)
    ) {
        let mut board = Board::new(4);
        for (i, mark) in marks.iter().enumerate() {
            if let Some(player) = mark {
                board.place(i, *player).unwrap();
            }
        }
        let lines = LineSet::new(4);
        prop_assume!(winner(&board, &lines).is_none());

        for side in [Player::X, Player::O] {
            if let Some(index) = oracle::winning_move(&board, &lines, side) {
                let mut probe = board.clone();
                probe.place(index, side).unwrap();
                prop_assert_eq!(winner(&probe, &lines), Some(side));
            }
        }
    }

    /// The oracle never answers on a full board and always answers otherwise.
    #[test]
    fn best_move_exists_iff_a_square_is_empty(
        marks in proptest::collection::vec(proptest::option::of(prop_oneof![Just(Player::X), Just(Player::O)]), 16)
    ) {
        let mut board = Board::new(4);
        let mut empties = 0usize;
        for (i, mark) in marks.iter().enumerate() {
            match mark {
                Some(player) => board.place(i, *player).unwrap(),
                None => empties += 1,
            }
        }
        let lines = LineSet::new(4);
        let best = oracle::best_move(&board, &lines, Player::X);
        prop_assert_eq!(best.is_some(), empties > 0);
        if let Some(index) = best {
            prop_assert!(board.is_empty(index));
        }
    }
}
