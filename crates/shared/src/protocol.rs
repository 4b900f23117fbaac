use serde::{Deserialize, Serialize};

/// Default depth requested from the analysis backend
pub const ANALYSIS_DEPTH: u32 = 18;

/// Default number of principal variations requested from the analysis backend
pub const ANALYSIS_VARIANTS: u32 = 1;

// ---- Move-suggestion backend (`POST /api/move`) ----

/// Request body for a move suggestion
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub fen: String,
    /// The backend reads the position from either field; both carry the FEN.
    pub message: String,
    pub depth: u8,
    pub is_white: bool,
}

impl MoveRequest {
    pub fn new(fen: impl Into<String>, depth: u8, is_white: bool) -> Self {
        let fen = fen.into();
        Self {
            message: fen.clone(),
            fen,
            depth,
            is_white,
        }
    }
}

/// Response body of a move suggestion
///
/// `move` has no fixed shape, see [`MovePayload`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoveResponse {
    #[serde(rename = "move", default)]
    pub mv: Option<MovePayload>,
    #[serde(default)]
    pub eval: Option<f64>,
}

/// Every shape the backend has been seen to return for `move`
///
/// Variants are tried in declaration order, so an object carrying both
/// `from`/`to` and `from_square`/`to_square` reads as [`MovePayload::Squares`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MovePayload {
    /// Coordinate or SAN text, e.g. `"e2e4"`, `"e7e8q"`, `"Nf3"`
    Text(String),
    /// `{ "from": "e2", "to": "e4", "promotion"?: "q" }`
    Squares {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<PromotionField>,
    },
    /// `{ "from_square": 12, "to_square": 28, "promotion"?: 5 }`, 0 = a1
    Indices {
        from_square: i64,
        to_square: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<PromotionField>,
    },
    /// Anything else; kept so the rejection can name what arrived
    Unrecognized(serde_json::Value),
}

impl MovePayload {
    pub fn text(value: impl Into<String>) -> Self {
        MovePayload::Text(value.into())
    }

    /// Short description of the payload shape for error messages
    pub fn shape(&self) -> &'static str {
        match self {
            MovePayload::Text(_) => "string",
            MovePayload::Squares { .. } => "from/to object",
            MovePayload::Indices { .. } => "square index object",
            MovePayload::Unrecognized(serde_json::Value::Object(_)) => "unrecognized object",
            MovePayload::Unrecognized(_) => "unrecognized value",
        }
    }
}

/// Promotion piece as either a letter (`"q"`) or a numeric piece code
/// (1 = pawn .. 6 = king, as python-chess numbers them)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum PromotionField {
    Letter(String),
    Code(u8),
}

// ---- Analysis backend (bidirectional stream) ----

/// Outbound analysis request, sent on connect and on every position change
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisRequest {
    pub fen: String,
    pub depth: u32,
    pub variants: u32,
}

impl AnalysisRequest {
    pub fn new(fen: impl Into<String>) -> Self {
        Self {
            fen: fen.into(),
            depth: ANALYSIS_DEPTH,
            variants: ANALYSIS_VARIANTS,
        }
    }
}

/// Kind tag of an inbound analysis message
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Move,
    Bestmove,
    #[serde(other)]
    Other,
}

/// Inbound analysis message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMessage {
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
    /// Evaluation from white's point of view, in pawns
    #[serde(default)]
    pub eval: Option<f64>,
    #[serde(default)]
    pub mate: Option<i32>,
    #[serde(default = "even_win_chance")]
    pub win_chance: f64,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub san: Option<String>,
}

impl AnalysisMessage {
    /// Only `move` and `bestmove` messages carry an evaluation
    pub fn is_evaluation(&self) -> bool {
        matches!(self.kind, AnalysisKind::Move | AnalysisKind::Bestmove)
    }
}

fn even_win_chance() -> f64 {
    50.0
}
