//! Type definitions shared across the game module
//!
//! Wraps the rules engine's colour/role types in serializable enums and defines
//! [`CanonicalMove`], the only move shape [`crate::game::rules::GamePosition`]
//! accepts.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role, Square};
use std::fmt;

/// Side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub const ALL: [PieceColor; 2] = [PieceColor::White, PieceColor::Black];

    pub fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    pub fn is_white(self) -> bool {
        self == PieceColor::White
    }

    /// Capitalised name used in status text
    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

impl From<Color> for PieceColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => PieceColor::White,
            Color::Black => PieceColor::Black,
        }
    }
}

impl From<PieceColor> for Color {
    fn from(color: PieceColor) -> Self {
        match color {
            PieceColor::White => Color::White,
            PieceColor::Black => Color::Black,
        }
    }
}

/// Kind of chess piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Material value in pawns
    ///
    /// King has value 0 as it is never captured.
    pub fn value(self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }

    /// Parse a piece letter, either case (`'q'`, `'N'`)
    pub fn from_char(c: char) -> Option<Self> {
        Role::from_char(c.to_ascii_lowercase()).map(PieceType::from)
    }

    /// Lowercase piece letter
    pub fn to_char(self) -> char {
        Role::from(self).char()
    }

    /// Map python-chess style piece codes (1 = pawn .. 6 = king)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceType::Pawn),
            2 => Some(PieceType::Knight),
            3 => Some(PieceType::Bishop),
            4 => Some(PieceType::Rook),
            5 => Some(PieceType::Queen),
            6 => Some(PieceType::King),
            _ => None,
        }
    }
}

impl From<Role> for PieceType {
    fn from(role: Role) -> Self {
        match role {
            Role::Pawn => PieceType::Pawn,
            Role::Knight => PieceType::Knight,
            Role::Bishop => PieceType::Bishop,
            Role::Rook => PieceType::Rook,
            Role::Queen => PieceType::Queen,
            Role::King => PieceType::King,
        }
    }
}

impl From<PieceType> for Role {
    fn from(piece_type: PieceType) -> Self {
        match piece_type {
            PieceType::Pawn => Role::Pawn,
            PieceType::Knight => Role::Knight,
            PieceType::Bishop => Role::Bishop,
            PieceType::Rook => Role::Rook,
            PieceType::Queen => Role::Queen,
            PieceType::King => Role::King,
        }
    }
}

/// A piece standing on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPiece {
    pub color: PieceColor,
    pub piece_type: PieceType,
}

/// Move as `from`/`to`/optional promotion
///
/// Castling is expressed with the king's own destination (`e1g1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl CanonicalMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }
}

impl fmt::Display for CanonicalMove {
    /// Coordinate notation, e.g. `e2e4` or `e7e8q`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

/// Orientation the board is viewed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardOrientation {
    #[default]
    White,
    Black,
}

impl BoardOrientation {
    pub fn flipped(self) -> Self {
        match self {
            BoardOrientation::White => BoardOrientation::Black,
            BoardOrientation::Black => BoardOrientation::White,
        }
    }
}
