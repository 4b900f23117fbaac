//! Game Flow Integration Tests
//!
//! Full games through the public session API:
//! - Human moves and the move history ledger
//! - Suggestions in every payload shape
//! - Rejected payloads leaving the session untouched
//! - Capture attribution

use chess_session::game::ai::{AIConfig, AIDifficulty, PlayerAssignment, PlayerType, Suggestion};
use chess_session::game::resources::history::MoveHistoryEntry;
use chess_session::game::types::{PieceColor, PieceType};
use chess_session::game::{GameError, GameSession, InteractionOutcome, SuggestionOutcome};
use serde_json::json;
use shakmaty::Square;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn humans() -> GameSession {
    GameSession::new().with_ai_config(AIConfig {
        players: PlayerAssignment {
            white: PlayerType::Human,
            black: PlayerType::Human,
        },
        difficulty: AIDifficulty::Easy,
    })
}

fn square(name: &str) -> Square {
    name.parse().expect("valid square")
}

/// Play `e2e4`-style moves by clicking
fn play(session: &mut GameSession, moves: &[&str]) {
    for text in moves {
        let from = square(&text[0..2]);
        let to = square(&text[2..4]);
        assert_eq!(session.click(from), InteractionOutcome::Selected(from), "{text}");
        assert!(
            matches!(session.click(to), InteractionOutcome::Moved { .. }),
            "{text} should be legal"
        );
    }
}

fn suggestion(value: serde_json::Value) -> Option<Suggestion> {
    Some(Suggestion {
        payload: serde_json::from_value(value).expect("every value is a payload"),
        eval: None,
    })
}

#[test]
fn test_first_move_e2e4() {
    let mut session = humans();
    play(&mut session, &["e2e4"]);

    assert!(session.fen().contains(" b "), "black to move: {}", session.fen());
    assert_eq!(session.history(), &[MoveHistoryEntry::new(1, "e4", "")]);
    assert!(session.captured_by(PieceColor::White).is_empty());
    assert!(session.captured_by(PieceColor::Black).is_empty());
}

#[test]
fn test_ruy_lopez_a6_completes_third_entry() {
    let mut session = humans();
    play(&mut session, &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]);

    assert_eq!(session.history().len(), 3);
    assert_eq!(session.history()[2], MoveHistoryEntry::new(3, "Bb5", "a6"));
}

#[test]
fn test_ai_answers_with_index_payload() {
    let mut session = GameSession::new().with_ai_config(AIConfig {
        players: PlayerAssignment {
            white: PlayerType::Ai,
            black: PlayerType::Human,
        },
        difficulty: AIDifficulty::Medium,
    });
    let request = session.next_suggestion_request().expect("white is AI");
    assert_eq!(request.fen, START_FEN);
    assert_eq!(request.depth, 3);

    let outcome = session.apply_suggestion(&request, suggestion(json!({"from_square": 12, "to_square": 28})));
    assert_eq!(outcome, SuggestionOutcome::Applied { san: "e4".to_string() });
    assert_eq!(session.position().piece_at(Square::E4).map(|p| p.piece_type), Some(PieceType::Pawn));
}

#[test]
fn test_ai_answers_in_every_shape() {
    let mut session = GameSession::new().with_ai_config(AIConfig {
        players: PlayerAssignment {
            white: PlayerType::Ai,
            black: PlayerType::Ai,
        },
        difficulty: AIDifficulty::Easy,
    });

    let answers = [
        json!("e2e4"),
        json!({"from": "e7", "to": "e5"}),
        json!({"from_square": 6, "to_square": 21}),
        json!("Nc6"),
    ];
    for answer in answers {
        let request = session.next_suggestion_request().expect("both sides AI");
        let outcome = session.apply_suggestion(&request, suggestion(answer.clone()));
        assert!(matches!(outcome, SuggestionOutcome::Applied { .. }), "{answer}: {outcome:?}");
    }

    assert_eq!(
        session.history(),
        &[
            MoveHistoryEntry::new(1, "e4", "e5"),
            MoveHistoryEntry::new(2, "Nf3", "Nc6"),
        ]
    );
}

#[test]
fn test_malformed_payload_leaves_position_unchanged() {
    let mut session = GameSession::new().with_ai_config(AIConfig {
        players: PlayerAssignment {
            white: PlayerType::Ai,
            black: PlayerType::Human,
        },
        difficulty: AIDifficulty::Easy,
    });
    let request = session.next_suggestion_request().unwrap();

    let outcome = session.apply_suggestion(&request, suggestion(json!({"foo": 1})));
    assert!(matches!(
        outcome,
        SuggestionOutcome::Rejected(GameError::UnrecognizedMoveFormat { .. })
    ));
    assert_eq!(session.fen(), START_FEN);
    assert!(session.history().is_empty());
    assert_eq!(session.status_text(), "White to move (ai)");
}

#[test]
fn test_illegal_suggestion_is_rejected() {
    let mut session = GameSession::new().with_ai_config(AIConfig {
        players: PlayerAssignment {
            white: PlayerType::Ai,
            black: PlayerType::Human,
        },
        difficulty: AIDifficulty::Easy,
    });
    let request = session.next_suggestion_request().unwrap();

    let outcome = session.apply_suggestion(&request, suggestion(json!("e2e5")));
    assert!(matches!(outcome, SuggestionOutcome::Rejected(GameError::IllegalMove { .. })));
    assert_eq!(session.fen(), START_FEN);
}

#[test]
fn test_en_passant_capture_is_recorded() {
    let mut session = humans();
    play(&mut session, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert!(session.position().piece_at(Square::D6).is_none());

    play(&mut session, &["e5d6"]);

    let taken = session.captured_by(PieceColor::White);
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].color, PieceColor::Black);
    assert_eq!(taken[0].piece_type, PieceType::Pawn);
    assert_eq!(session.history()[2], MoveHistoryEntry::new(3, "exd6", ""));
}

#[test]
fn test_captures_accumulate_for_both_sides() {
    let mut session = humans();
    // 1.e4 d5 2.exd5 Qxd5 3.Nc3 Qxa2 4.Rxa2
    play(
        &mut session,
        &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a2", "a1a2"],
    );

    assert_eq!(session.captured_by(PieceColor::White).len(), 2);
    assert_eq!(session.captured_by(PieceColor::Black).len(), 2);
    assert_eq!(session.material_difference(), Some((PieceColor::White, 8)));
}

#[test]
fn test_fools_mate_ends_the_game() {
    let mut session = humans();
    play(&mut session, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(session.status_text(), "Black wins!");
    assert_eq!(session.history()[1], MoveHistoryEntry::new(2, "g4", "Qh4#"));
    assert_eq!(session.click(Square::E1), InteractionOutcome::Selected(Square::E1));
    assert!(session.highlights().is_empty(), "mated king has no moves");
}

#[test]
fn test_new_game_resets_board_state() {
    let mut session = humans();
    play(&mut session, &["e2e4", "d7d5", "e4d5"]);
    session.new_game();

    assert_eq!(session.fen(), START_FEN);
    assert!(session.history().is_empty());
    assert!(session.captured_by(PieceColor::White).is_empty());
    assert_eq!(session.material_difference(), None);
}
