//! Move normalizer for suggestion backend payloads
//!
//! The backend's `move` field has no fixed shape. [`normalize`] runs an ordered
//! list of parse strategies over the payload; the first one that recognises it
//! produces a candidate that is then checked against the position. When no
//! strategy matches, or the candidate is illegal, text payloads get one more try
//! as SAN. Nothing partially parsed ever leaves this module.

use crate::game::error::{GameError, GameResult};
use crate::game::rules::GamePosition;
use crate::game::types::{CanonicalMove, PieceType};
use shakmaty::{File, Rank, Square};
use shared::protocol::{MovePayload, PromotionField};
use tracing::debug;

/// Outcome of one parse strategy
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeMatch {
    Matched(CanonicalMove),
    NotThisShape,
    /// Payload has this shape but its contents are unusable
    Invalid(GameError),
}

type Strategy = fn(&MovePayload) -> ShapeMatch;

/// Strategies in the order they are tried
const STRATEGIES: [(&str, Strategy); 3] = [
    ("coordinate string", parse_coordinate_text),
    ("from/to object", parse_square_object),
    ("square index object", parse_index_object),
];

/// Turn a backend payload into a legal [`CanonicalMove`] for `position`
pub fn normalize(payload: &MovePayload, position: &GamePosition) -> GameResult<CanonicalMove> {
    let mut failure = None;

    for (name, strategy) in STRATEGIES {
        match strategy(payload) {
            ShapeMatch::Matched(candidate) => {
                if let Some(mv) = position.canonicalize(&candidate) {
                    debug!("[AI] Normalized {} as {}: {}", describe(payload), name, mv);
                    return Ok(mv);
                }
                failure = Some(GameError::IllegalMove {
                    message: format!("{candidate} in {}", position.fen()),
                });
                break;
            }
            ShapeMatch::NotThisShape => continue,
            ShapeMatch::Invalid(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    if let MovePayload::Text(text) = payload {
        if let Some(mv) = position.parse_san(text) {
            debug!("[AI] Normalized {:?} as SAN: {}", text, mv);
            return Ok(mv);
        }
    }

    Err(failure.unwrap_or_else(|| unrecognized(payload)))
}

/// `"e2e4"` / `"e7e8q"`
fn parse_coordinate_text(payload: &MovePayload) -> ShapeMatch {
    let MovePayload::Text(text) = payload else {
        return ShapeMatch::NotThisShape;
    };
    let text = text.trim();
    if !(4..=5).contains(&text.len()) {
        return ShapeMatch::NotThisShape;
    }
    let (Some(from), Some(to)) = (text.get(0..2), text.get(2..4)) else {
        return ShapeMatch::NotThisShape;
    };
    let (Ok(from), Ok(to)) = (from.parse::<Square>(), to.parse::<Square>()) else {
        return ShapeMatch::NotThisShape;
    };
    let promotion = match text.get(4..).and_then(|rest| rest.chars().next()) {
        None => None,
        Some(letter) => match PieceType::from_char(letter) {
            Some(piece_type) => Some(piece_type),
            None => return ShapeMatch::NotThisShape,
        },
    };
    ShapeMatch::Matched(CanonicalMove { from, to, promotion })
}

/// `{ "from": "e2", "to": "e4", "promotion"?: "q" }`
fn parse_square_object(payload: &MovePayload) -> ShapeMatch {
    let MovePayload::Squares { from, to, promotion } = payload else {
        return ShapeMatch::NotThisShape;
    };
    let (Ok(from), Ok(to)) = (from.trim().parse::<Square>(), to.trim().parse::<Square>()) else {
        return ShapeMatch::Invalid(unrecognized(payload));
    };
    match parse_promotion(promotion.as_ref()) {
        Ok(promotion) => ShapeMatch::Matched(CanonicalMove { from, to, promotion }),
        Err(()) => ShapeMatch::Invalid(unrecognized(payload)),
    }
}

/// `{ "from_square": 12, "to_square": 28, "promotion"?: 5 }`
fn parse_index_object(payload: &MovePayload) -> ShapeMatch {
    let MovePayload::Indices {
        from_square,
        to_square,
        promotion,
    } = payload
    else {
        return ShapeMatch::NotThisShape;
    };
    let from = match square_from_index(*from_square) {
        Ok(square) => square,
        Err(err) => return ShapeMatch::Invalid(err),
    };
    let to = match square_from_index(*to_square) {
        Ok(square) => square,
        Err(err) => return ShapeMatch::Invalid(err),
    };
    match parse_promotion(promotion.as_ref()) {
        Ok(promotion) => ShapeMatch::Matched(CanonicalMove { from, to, promotion }),
        Err(()) => ShapeMatch::Invalid(unrecognized(payload)),
    }
}

/// 0 = a1, file = index mod 8, rank = index div 8
pub fn square_from_index(index: i64) -> GameResult<Square> {
    if !(0..64).contains(&index) {
        return Err(GameError::InvalidSquareIndex { index });
    }
    let index = index as u32;
    Ok(Square::from_coords(File::new(index % 8), Rank::new(index / 8)))
}

fn parse_promotion(field: Option<&PromotionField>) -> Result<Option<PieceType>, ()> {
    match field {
        None => Ok(None),
        Some(PromotionField::Letter(letter)) => {
            let mut chars = letter.trim().chars();
            match (chars.next(), chars.next()) {
                (None, _) => Ok(None),
                (Some(c), None) => PieceType::from_char(c).map(Some).ok_or(()),
                _ => Err(()),
            }
        }
        Some(PromotionField::Code(code)) => PieceType::from_code(*code).map(Some).ok_or(()),
    }
}

fn describe(payload: &MovePayload) -> String {
    serde_json::to_string(payload).unwrap_or_else(|_| format!("{payload:?}"))
}

fn unrecognized(payload: &MovePayload) -> GameError {
    GameError::UnrecognizedMoveFormat {
        shape: payload.shape().to_string(),
        payload: describe(payload),
    }
}
