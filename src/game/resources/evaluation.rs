//! Live evaluation sample and best-move arrow
//!
//! Each analysis message replaces the sample wholesale; there is no merging
//! with older samples and no sequence check.

use crate::game::types::BoardOrientation;
use serde::Serialize;
use shakmaty::Square;
use shared::protocol::AnalysisMessage;

/// Engine score; exactly one form is meaningful at a time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalScore {
    /// Evaluation from White's point of view, as reported by the backend
    Centipawns(f64),
    /// Forced mate in N; negative when Black mates
    MateIn(i32),
}

/// Latest evaluation received from the analysis stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSample {
    pub score: Option<EvalScore>,
    pub win_chance_percent: f64,
    pub depth: u32,
}

impl Default for EvaluationSample {
    fn default() -> Self {
        Self {
            score: None,
            win_chance_percent: 50.0,
            depth: 0,
        }
    }
}

impl EvaluationSample {
    /// Mate takes precedence over a numeric evaluation
    pub fn from_message(message: &AnalysisMessage) -> Self {
        let score = match (message.mate, message.eval) {
            (Some(mate), _) => Some(EvalScore::MateIn(mate)),
            (None, Some(eval)) => Some(EvalScore::Centipawns(eval)),
            (None, None) => None,
        };
        Self {
            score,
            win_chance_percent: message.win_chance,
            depth: message.depth,
        }
    }

    /// Share of the bar drawn for White, clamped to 0..=100
    pub fn white_bar_percent(&self) -> f64 {
        self.win_chance_percent.clamp(0.0, 100.0)
    }

    /// Bar label: `M3` for mates, one decimal otherwise, sign flipped when
    /// viewing from Black's side
    pub fn label(&self, orientation: BoardOrientation) -> String {
        match self.score {
            Some(EvalScore::MateIn(mate)) => format!("M{}", mate.unsigned_abs()),
            Some(EvalScore::Centipawns(eval)) => {
                let shown = match orientation {
                    BoardOrientation::White => eval,
                    BoardOrientation::Black => -eval,
                };
                format!("{shown:.1}")
            }
            None => "0.0".to_string(),
        }
    }
}

/// Suggested move drawn as an arrow on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMoveArrow {
    pub from: Square,
    pub to: Square,
}

impl BestMoveArrow {
    /// Arrow endpoints from an analysis message, if both squares parse
    pub fn from_message(message: &AnalysisMessage) -> Option<Self> {
        let from = message.from.as_deref()?.parse().ok()?;
        let to = message.to.as_deref()?.parse().ok()?;
        Some(Self { from, to })
    }
}
