//! End-to-end games played through the verification judge.

use humancheck_games::{Judge, MoveError, Phase, Player, Square, Verdict};

/// Plays a human move and the oracle's reply, asserting both continue.
fn exchange(judge: &mut Judge, index: usize) {
    assert_eq!(
        judge.submit_human_move(index).unwrap(),
        Verdict::Continue,
        "human move {index} should continue the game"
    );
    assert_eq!(judge.phase(), Phase::AwaitingOracle);
    assert_eq!(
        judge.oracle_reply().unwrap(),
        Verdict::Continue,
        "oracle reply after human {index} should continue the game"
    );
    assert_eq!(judge.phase(), Phase::AwaitingHuman);
}

fn occupied_by(judge: &Judge, player: Player) -> Vec<usize> {
    judge
        .board()
        .squares()
        .iter()
        .enumerate()
        .filter_map(|(i, &sq)| (sq == Square::Occupied(player)).then_some(i))
        .collect()
}

#[test]
fn test_optimal_play_runs_to_a_verified_draw() {
    // Every human move below either sits in a non-forced position or takes
    // the forced block, so the judge accepts the whole game. The oracle
    // blocks each threat as it forms and the board fills without a line.
    let mut judge = Judge::new(4, Player::X);

    exchange(&mut judge, 0); // oracle falls back to 1
    exchange(&mut judge, 4); // oracle falls back to 2
    exchange(&mut judge, 8); // oracle blocks column 0 at 12
    exchange(&mut judge, 5); // oracle falls back to 3
    exchange(&mut judge, 6); // oracle blocks row 1 at 7
    exchange(&mut judge, 10); // oracle blocks the diagonal at 15
    exchange(&mut judge, 11); // forced: blocks column 3; oracle blocks row 2 at 9

    assert_eq!(occupied_by(&judge, Player::X), vec![0, 4, 5, 6, 8, 10, 11]);
    assert_eq!(occupied_by(&judge, Player::O), vec![1, 2, 3, 7, 9, 12, 15]);

    // two squares left; the human takes 13 and the oracle's 14 fills the
    // board with no four-in-a-line anywhere
    assert_eq!(judge.submit_human_move(13).unwrap(), Verdict::Continue);
    assert_eq!(judge.oracle_reply().unwrap(), Verdict::Draw);
    assert_eq!(judge.phase(), Phase::Draw);
    assert_eq!(judge.verified(), Some(true));
}

#[test]
fn test_missed_forced_block_fails_mid_game() {
    // same opening as above, but when column 3 must be blocked at 11 the
    // human plays 9 instead
    let mut judge = Judge::new(4, Player::X);
    for index in [0, 4, 8, 5, 6, 10] {
        exchange(&mut judge, index);
    }

    assert_eq!(judge.submit_human_move(9).unwrap(), Verdict::Fail);
    assert_eq!(judge.phase(), Phase::Failed);
    assert_eq!(judge.verified(), Some(false));
    // the rejected-for-verification move is still on the board
    assert_eq!(judge.board().get(9), Some(Square::Occupied(Player::X)));
    // and no oracle reply follows
    assert_eq!(judge.oracle_reply(), Err(MoveError::Terminal));
}

#[test]
fn test_reset_mid_game_starts_over() {
    let mut judge = Judge::new(4, Player::X);
    exchange(&mut judge, 0);
    judge.reset();
    assert_eq!(judge.phase(), Phase::AwaitingHuman);
    assert!(
        judge
            .board()
            .squares()
            .iter()
            .all(|&sq| sq == Square::Empty)
    );
    // the opening book starts from scratch: 0 is free again
    assert_eq!(judge.submit_human_move(0).unwrap(), Verdict::Continue);
}

#[test]
fn test_board_snapshot_reads_do_not_mutate() {
    let mut judge = Judge::new(4, Player::X);
    judge.submit_human_move(0).unwrap();
    let before: Vec<Square> = judge.board().squares().to_vec();
    for _ in 0..3 {
        let _ = judge.board().squares();
        let _ = judge.phase();
        let _ = judge.verified();
    }
    assert_eq!(judge.board().squares(), before.as_slice());
    assert_eq!(judge.phase(), Phase::AwaitingOracle);
}
