//! Authoritative position wrapper
//!
//! [`GamePosition`] is immutable per ply: [`GamePosition::apply`] returns a new
//! value and leaves the receiver untouched, so the previous position stays a
//! valid operand for capture diffing. Legality, SAN and FEN come from
//! `shakmaty`.

use crate::game::error::{GameError, GameResult};
use crate::game::types::{BoardPiece, CanonicalMove, PieceColor, PieceType};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Move, Position, Square};

/// Halfmove clock value at which the fifty-move rule applies
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position that make a threefold repetition
const REPETITION_LIMIT: usize = 3;

/// Authoritative chess position plus the repetition keys of every position
/// reached since the session started
#[derive(Debug, Clone)]
pub struct GamePosition {
    chess: Chess,
    repetitions: Vec<u64>,
}

/// Result of a successfully applied move
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub position: GamePosition,
    /// The move as actually played (promotion filled in, extras dropped)
    pub played: CanonicalMove,
    /// SAN including check/mate suffix, e.g. `Nf3`, `Qxf7#`
    pub san: String,
    pub mover: PieceColor,
}

impl Default for GamePosition {
    fn default() -> Self {
        Self::from_chess(Chess::default())
    }
}

impl PartialEq for GamePosition {
    /// Two positions are equal when their FEN is equal
    fn eq(&self, other: &Self) -> bool {
        self.fen() == other.fen()
    }
}

impl GamePosition {
    /// Standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a position from FEN
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let invalid = |message: String| GameError::InvalidFen {
            fen: fen.to_string(),
            message,
        };
        let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{e}")))?;
        let chess: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self::from_chess(chess))
    }

    fn from_chess(chess: Chess) -> Self {
        let key = repetition_key(&chess);
        Self {
            chess,
            repetitions: vec![key],
        }
    }

    /// FEN of this position
    pub fn fen(&self) -> String {
        Fen::from_position(self.chess.clone(), EnPassantMode::Legal).to_string()
    }

    pub fn side_to_move(&self) -> PieceColor {
        self.chess.turn().into()
    }

    pub fn piece_at(&self, square: Square) -> Option<BoardPiece> {
        self.chess.board().piece_at(square).map(|piece| BoardPiece {
            color: piece.color.into(),
            piece_type: piece.role.into(),
        })
    }

    /// Whether `square` holds a piece of the side to move
    pub fn is_own_piece(&self, square: Square) -> bool {
        self.piece_at(square)
            .is_some_and(|piece| piece.color == self.side_to_move())
    }

    /// Legal destination squares for the piece on `from`
    ///
    /// Promotions collapse to one destination; castling reports the king's
    /// destination square.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = self
            .chess
            .legal_moves()
            .iter()
            .filter_map(canonical_of)
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect();
        destinations.sort();
        destinations.dedup();
        destinations
    }

    /// Every legal move in canonical form
    pub fn legal_moves(&self) -> Vec<CanonicalMove> {
        self.chess.legal_moves().iter().filter_map(canonical_of).collect()
    }

    /// Resolve `mv` to the legal engine move it names
    ///
    /// A missing promotion on a promoting move defaults to queen; a promotion
    /// on a move that does not promote is ignored.
    fn resolve(&self, mv: &CanonicalMove) -> Option<Move> {
        let wanted_promotion = mv.promotion.unwrap_or(PieceType::Queen);
        self.chess.legal_moves().into_iter().find(|candidate| {
            let Some(canonical) = canonical_of(candidate) else {
                return false;
            };
            if canonical.from != mv.from || canonical.to != mv.to {
                return false;
            }
            match candidate.promotion() {
                Some(role) => PieceType::from(role) == wanted_promotion,
                None => true,
            }
        })
    }

    /// Canonical form of `mv` if it is legal here
    pub fn canonicalize(&self, mv: &CanonicalMove) -> Option<CanonicalMove> {
        self.resolve(mv).as_ref().and_then(canonical_of)
    }

    /// Parse SAN (`Nf3`, `exd5`, `O-O`, `e8=Q+`) against this position
    pub fn parse_san(&self, text: &str) -> Option<CanonicalMove> {
        let san: SanPlus = text.trim().parse().ok()?;
        let mv = san.san.to_move(&self.chess).ok()?;
        canonical_of(&mv)
    }

    /// Apply a move, returning the successor position
    ///
    /// Illegal input yields [`GameError::IllegalMove`] and `self` is unchanged.
    pub fn apply(&self, mv: &CanonicalMove) -> GameResult<AppliedMove> {
        let engine_move = self.resolve(mv).ok_or_else(|| GameError::IllegalMove {
            message: format!("{mv} in {}", self.fen()),
        })?;
        let played = canonical_of(&engine_move).ok_or_else(|| GameError::IllegalMove {
            message: format!("{mv} has no board squares"),
        })?;

        let mover = self.side_to_move();
        let mut next = self.chess.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut next, &engine_move).to_string();

        let mut repetitions = self.repetitions.clone();
        repetitions.push(repetition_key(&next));

        Ok(AppliedMove {
            position: GamePosition {
                chess: next,
                repetitions,
            },
            played,
            san,
            mover,
        })
    }

    pub fn is_check(&self) -> bool {
        self.chess.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.chess.is_checkmate()
    }

    /// Stalemate, insufficient material, fifty-move rule or threefold repetition
    pub fn is_draw(&self) -> bool {
        self.chess.is_stalemate()
            || self.chess.is_insufficient_material()
            || self.chess.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || self.is_threefold_repetition()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let Some(current) = self.repetitions.last() else {
            return false;
        };
        self.repetitions.iter().filter(|key| *key == current).count() >= REPETITION_LIMIT
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// Winner of a decided game, `None` while playing or drawn
    pub fn winner(&self) -> Option<PieceColor> {
        self.is_checkmate().then(|| self.side_to_move().opposite())
    }

    /// Every occupied square with its piece
    pub fn pieces(&self) -> impl Iterator<Item = (Square, BoardPiece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |square| self.piece_at(square).map(|piece| (square, piece)))
    }
}

fn repetition_key(chess: &Chess) -> u64 {
    chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}

/// Engine move to canonical form; castling maps to the king's destination
fn canonical_of(mv: &Move) -> Option<CanonicalMove> {
    match *mv {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                File::G
            } else {
                File::C
            };
            Some(CanonicalMove::new(king, Square::from_coords(file, king.rank())))
        }
        _ => {
            let from = mv.from()?;
            Some(CanonicalMove {
                from,
                to: mv.to(),
                promotion: mv.promotion().map(PieceType::from),
            })
        }
    }
}
