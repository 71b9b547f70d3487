//! End-to-end move resolution on hand-built positions.

use strictly_generals::{
    Board, BoardBuilder, Game, Move, MoveError, MoveKind, MoveRequest, PIECES_PER_SIDE, Phase,
    Piece, Rank, Side, TileIndex,
};

fn tile(i: usize) -> TileIndex {
    TileIndex::new(i).unwrap()
}

fn position(pieces: &[(usize, Rank, Side)]) -> Game {
    let mut board = Board::new();
    for &(index, rank, side) in pieces {
        board.place(tile(index), Piece::new(rank, side)).unwrap();
    }
    Game::with_position(board, Side::White).unwrap()
}

fn total(game: &Game) -> usize {
    game.live_pieces(Side::White) + game.live_pieces(Side::Black)
}

#[test]
fn test_scenario_a_normal_move() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (62, Rank::Private, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Normal);
    assert!(game.board().is_empty(tile(10)));
    assert_eq!(
        game.board().piece_at(tile(1)),
        Some(Piece::new(Rank::Private, Side::White))
    );
    assert_eq!(game.winner(), None);
}

#[test]
fn test_scenario_b_private_loses_to_sergeant() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (30, Rank::Captain, Side::White),
        (1, Rank::Sergeant, Side::Black),
    ]);
    let before = game.live_pieces(Side::White);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    assert_eq!(
        game.board().piece_at(tile(1)),
        Some(Piece::new(Rank::Sergeant, Side::Black))
    );
    assert!(game.board().is_empty(tile(10)));
    assert_eq!(game.live_pieces(Side::White), before - 1);
    assert_eq!(game.board().piece_count(Side::White), before - 1);
}

#[test]
fn test_scenario_c_spy_loses_to_private() {
    let mut game = position(&[
        (10, Rank::Spy, Side::White),
        (30, Rank::Captain, Side::White),
        (1, Rank::Private, Side::Black),
    ]);

    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(
        game.board().piece_at(tile(1)),
        Some(Piece::new(Rank::Private, Side::Black))
    );
    assert!(game.board().is_empty(tile(10)));
    assert_eq!(game.live_pieces(Side::White), 1);
}

#[test]
fn test_private_attacking_spy_wins() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (1, Rank::Spy, Side::Black),
        (70, Rank::Private, Side::Black),
    ]);

    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(
        game.board().piece_at(tile(1)),
        Some(Piece::new(Rank::Private, Side::White))
    );
    assert_eq!(game.live_pieces(Side::Black), 1);
}

#[test]
fn test_scenario_d_flag_reaches_goal_row() {
    let mut game = position(&[
        (58, Rank::Flag, Side::White),
        (0, Rank::Private, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(58), tile(67)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Normal);
    assert_eq!(game.winner(), Some(Side::White));
    assert_eq!(game.phase(), Phase::Concluded);
    assert_eq!(game.turn(), 1);
    assert_eq!(
        game.attempt_move(Side::Black, tile(0), tile(1)),
        Err(MoveError::GameOver)
    );
}

#[test]
fn test_black_flag_goal_is_row_zero() {
    let mut board = Board::new();
    board.place(tile(9), Piece::new(Rank::Flag, Side::Black)).unwrap();
    board.place(tile(70), Piece::new(Rank::Private, Side::White)).unwrap();
    let mut game = Game::with_position(board, Side::Black).unwrap();

    game.attempt_move(Side::Black, tile(9), tile(0)).unwrap();
    assert_eq!(game.winner(), Some(Side::Black));
}

#[test]
fn test_scenario_e_draw_removes_both() {
    let mut game = position(&[
        (10, Rank::Major, Side::White),
        (1, Rank::Major, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Draw);
    assert!(game.board().is_empty(tile(1)));
    assert!(game.board().is_empty(tile(10)));
    assert_eq!(total(&game), 0);
    assert_eq!(game.winner(), None);
    assert_eq!(game.phase(), Phase::Concluded);
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.turn(), 1);
}

#[test]
fn test_flag_draw_is_not_capture() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (30, Rank::Flag, Side::White),
        (1, Rank::Private, Side::Black),
        (60, Rank::Flag, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Draw);
    assert_eq!(game.winner(), None);
    assert_eq!(game.phase(), Phase::InProgress);
}

#[test]
fn test_flag_attacking_flag_wins() {
    let mut game = position(&[
        (10, Rank::Flag, Side::White),
        (1, Rank::Flag, Side::Black),
        (70, Rank::Private, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    assert_eq!(game.winner(), Some(Side::White));
}

#[test]
fn test_capturing_flag_wins() {
    let mut game = position(&[
        (10, Rank::Sergeant, Side::White),
        (1, Rank::Flag, Side::Black),
        (70, Rank::FiveStarGeneral, Side::Black),
    ]);

    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(game.winner(), Some(Side::White));
    assert_eq!(game.phase(), Phase::Concluded);
}

#[test]
fn test_eliminating_last_piece_wins() {
    let mut game = position(&[
        (10, Rank::Colonel, Side::White),
        (1, Rank::Major, Side::Black),
    ]);

    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(game.live_pieces(Side::Black), 0);
    assert_eq!(game.winner(), Some(Side::White));
}

#[test]
fn test_losing_last_piece_loses_game() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (1, Rank::Sergeant, Side::Black),
        (70, Rank::Major, Side::Black),
    ]);

    let mv = game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    assert_eq!(game.live_pieces(Side::White), 0);
    assert_eq!(game.winner(), Some(Side::Black));
    assert_eq!(game.phase(), Phase::Concluded);
    assert_eq!(
        game.attempt_move(Side::Black, tile(70), tile(61)),
        Err(MoveError::GameOver)
    );
}

#[test]
fn test_draw_emptying_board_refuses_further_moves() {
    let mut game = position(&[
        (10, Rank::Major, Side::White),
        (1, Rank::Major, Side::Black),
    ]);

    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(
        game.attempt_move(Side::Black, tile(1), tile(2)),
        Err(MoveError::GameOver)
    );
    assert!(game.advance_turn().is_err());
}

#[test]
fn test_piece_count_deltas_by_kind() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (20, Rank::Major, Side::White),
        (30, Rank::Captain, Side::White),
        (40, Rank::Captain, Side::Black),
        (29, Rank::Sergeant, Side::Black),
        (70, Rank::Private, Side::Black),
    ]);

    // Normal: no change.
    let before = total(&game);
    game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
    assert_eq!(total(&game), before);

    // Aggressive: one piece leaves.
    let before = total(&game);
    let mv = game.attempt_move(Side::Black, tile(29), tile(20)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    assert_eq!(total(&game), before - 1);

    // Draw: two pieces leave.
    let before = total(&game);
    let mv = game.attempt_move(Side::White, tile(30), tile(31)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Normal);
    game.attempt_move(Side::Black, tile(40), tile(31)).unwrap();
    assert_eq!(total(&game), before - 2);
}

#[test]
fn test_rejected_moves_leave_board_untouched() {
    let mut game = position(&[
        (10, Rank::Private, Side::White),
        (1, Rank::Sergeant, Side::White),
        (62, Rank::Private, Side::Black),
    ]);
    let before = game.board().clone();

    let attempts = [
        (Side::White, 11, 12, MoveError::NoPieceAtSource(tile(11))),
        (
            Side::White,
            62,
            53,
            MoveError::NotOwner {
                side: Side::White,
                tile: tile(62),
            },
        ),
        (
            Side::White,
            10,
            28,
            MoveError::Unreachable {
                source: tile(10),
                target: tile(28),
            },
        ),
        (Side::White, 10, 1, MoveError::FriendlyOccupied(tile(1))),
        (Side::Black, 62, 53, MoveError::WrongSide(Side::Black)),
    ];

    for (side, source, target, expected) in attempts {
        assert_eq!(game.attempt_move(side, tile(source), tile(target)), Err(expected.clone()));
        assert_eq!(game.last_rejected().map(|r| &r.reason), Some(&expected));
        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), 1);
    }
}

#[test]
fn test_no_wraparound_at_row_edges() {
    let game = position(&[
        (9, Rank::Private, Side::White),
        (17, Rank::Private, Side::White),
        (62, Rank::Private, Side::Black),
    ]);
    assert_eq!(game.reachable(tile(9)), vec![tile(0), tile(18), tile(10)]);
    assert_eq!(game.reachable(tile(17)), vec![tile(8), tile(26), tile(16)]);
}

#[test]
fn test_execute_is_idempotent_guarded() {
    let mut board = Board::new();
    board.place(tile(10), Piece::new(Rank::Major, Side::White)).unwrap();
    board.place(tile(1), Piece::new(Rank::Captain, Side::Black)).unwrap();

    let request = MoveRequest::new(Side::White, tile(10), tile(1));
    let mut mv = Move::evaluate(&board, request, 1).unwrap();
    mv.execute(&mut board).unwrap();
    let after_first = board.clone();

    assert_eq!(mv.execute(&mut board), Err(MoveError::AlreadyExecuted(1)));
    assert_eq!(board, after_first);
}

#[test]
fn test_demo_game_opening() {
    let mut game = Game::new();
    assert_eq!(game.build(&BoardBuilder::demo()), Ok(2 * PIECES_PER_SIDE));
    game.start(Side::White).unwrap();

    // White private takes the black spy head-on.
    let mv = game.attempt_move(Side::White, tile(27), tile(36)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    // Black private loses against the white sergeant.
    let mv = game.attempt_move(Side::Black, tile(37), tile(28)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Aggressive);
    // Five-star generals cancel out.
    let mv = game.attempt_move(Side::White, tile(31), tile(40)).unwrap();
    assert_eq!(mv.kind(), MoveKind::Draw);

    assert_eq!(game.live_pieces(Side::White), PIECES_PER_SIDE - 1);
    assert_eq!(game.live_pieces(Side::Black), PIECES_PER_SIDE - 3);
    assert_eq!(game.history().len(), 3);
    assert_eq!(game.last_executed_turn(), Some(3));
    assert_eq!(game.active_side(), Side::Black);
}
