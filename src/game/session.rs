//! Board interaction controller
//!
//! [`GameSession`] owns the authoritative position together with everything
//! derived from it (move history, captured material, selection, evaluation)
//! and is the only place moves are applied. All transitions run to completion
//! synchronously; async work (suggestion requests, the analysis stream) is
//! driven from outside by [`crate::game::driver::SessionDriver`], which feeds
//! results back in through [`GameSession::apply_suggestion`] and
//! [`GameSession::apply_analysis`].
//!
//! # Interaction state machine
//!
//! ```text
//! Idle        --click(own piece)-->  Selected(sq)
//! Selected(s) --click(s)-->          Idle
//! Selected(s) --click(t)-->          Idle, try s->t; on rejection Selected(t) if t is own piece
//! *           --drag_start(own)-->   Selected(sq)
//! *           --drop(from, to)-->    same as a click-based attempt from -> to
//! ```
//!
//! Every user transition is ignored while the side to move is AI-controlled
//! or a suggestion request is in flight.

use std::collections::HashMap;

use shakmaty::Square;
use shared::protocol::AnalysisMessage;
use tracing::{debug, info, warn};

use crate::game::ai::{normalize, AIConfig, AIDifficulty, PendingSuggestion, PlayerType, Suggestion};
use crate::game::error::{GameError, GameResult};
use crate::game::resources::{
    diff_captures, BestMoveArrow, CapturedPiece, CapturedPieces, EvaluationSample, MoveHistory,
    MoveHistoryEntry, Selection, SquareHighlight,
};
use crate::game::rules::GamePosition;
use crate::game::types::{BoardOrientation, CanonicalMove, PieceColor};

/// Everything one accepted move changes, computed before anything is committed
#[derive(Debug, Clone)]
pub struct SessionAdvance {
    pub position: GamePosition,
    pub played: CanonicalMove,
    pub san: String,
    pub mover: PieceColor,
    pub captures: Vec<CapturedPiece>,
}

/// Compute the successor position and its ledger/capture deltas
///
/// Pure: on `Err` nothing has been touched.
pub fn advance(position: &GamePosition, mv: &CanonicalMove) -> GameResult<SessionAdvance> {
    let applied = position.apply(mv)?;
    let captures = diff_captures(position, &applied.position);
    Ok(SessionAdvance {
        position: applied.position,
        played: applied.played,
        san: applied.san,
        mover: applied.mover,
        captures,
    })
}

/// Result of a user interaction
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// Turn guard refused the input, or there was nothing to act on
    Ignored,
    Selected(Square),
    Deselected,
    Moved { san: String },
    /// Move attempt was illegal; the session is idle
    Rejected(GameError),
}

/// Result of feeding a suggestion response back into the session
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    Applied { san: String },
    /// Response does not belong to the current request or position
    Stale,
    /// Backend had nothing to offer; the side stays stalled until a retry
    NoSuggestion,
    /// Payload could not be turned into a legal move
    Rejected(GameError),
}

/// Game session state
#[derive(Debug, Clone)]
pub struct GameSession {
    position: GamePosition,
    history: MoveHistory,
    captured: CapturedPieces,
    selection: Selection,
    ai: AIConfig,
    pending: Option<PendingSuggestion>,
    /// FEN at which the backend last failed to produce a move
    stalled_fen: Option<String>,
    evaluation: EvaluationSample,
    best_move: Option<BestMoveArrow>,
    show_eval: bool,
    show_best_move: bool,
    orientation: BoardOrientation,
    last_ai_eval: Option<f64>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_position(GamePosition::new())
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session starting from an arbitrary position
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        Ok(Self::from_position(GamePosition::from_fen(fen)?))
    }

    fn from_position(position: GamePosition) -> Self {
        Self {
            position,
            history: MoveHistory::default(),
            captured: CapturedPieces::default(),
            selection: Selection::default(),
            ai: AIConfig::default(),
            pending: None,
            stalled_fen: None,
            evaluation: EvaluationSample::default(),
            best_move: None,
            show_eval: true,
            show_best_move: false,
            orientation: BoardOrientation::default(),
            last_ai_eval: None,
        }
    }

    pub fn with_ai_config(mut self, ai: AIConfig) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_display(mut self, show_eval: bool, show_best_move: bool) -> Self {
        self.show_eval = show_eval;
        self.show_best_move = show_best_move;
        self
    }

    // ---- Turn guard ----

    /// Whether direct user input may act on the board right now
    pub fn accepts_user_input(&self) -> bool {
        self.pending.is_none() && !self.ai.players.is_ai(self.position.side_to_move())
    }

    // ---- User interaction ----

    pub fn click(&mut self, square: Square) -> InteractionOutcome {
        if !self.accepts_user_input() {
            debug!("[INPUT] Click on {} ignored: not a human turn", square);
            return InteractionOutcome::Ignored;
        }

        match self.selection.selected_square {
            None => self.select_own_piece(square),
            Some(selected) if selected == square => {
                self.selection.clear();
                InteractionOutcome::Deselected
            }
            Some(selected) => self.attempt_user_move(selected, square),
        }
    }

    pub fn drag_start(&mut self, square: Square) -> InteractionOutcome {
        if !self.accepts_user_input() {
            debug!("[INPUT] Drag from {} ignored: not a human turn", square);
            return InteractionOutcome::Ignored;
        }
        self.select_own_piece(square)
    }

    pub fn drop(&mut self, from: Square, to: Square) -> InteractionOutcome {
        if !self.accepts_user_input() {
            debug!("[INPUT] Drop {}{} ignored: not a human turn", from, to);
            return InteractionOutcome::Ignored;
        }
        self.attempt_user_move(from, to)
    }

    fn select_own_piece(&mut self, square: Square) -> InteractionOutcome {
        if !self.position.is_own_piece(square) {
            return InteractionOutcome::Ignored;
        }
        let destinations = self.position.legal_destinations(square);
        debug!("[INPUT] Selected {} ({} destinations)", square, destinations.len());
        self.selection.select(square, destinations);
        InteractionOutcome::Selected(square)
    }

    fn attempt_user_move(&mut self, from: Square, to: Square) -> InteractionOutcome {
        self.selection.clear();
        match self.play(&CanonicalMove::new(from, to)) {
            Ok(san) => InteractionOutcome::Moved { san },
            Err(err) => {
                debug!("[INPUT] {}", err);
                if self.position.is_own_piece(to) {
                    self.select_own_piece(to)
                } else {
                    InteractionOutcome::Rejected(err)
                }
            }
        }
    }

    // ---- Move application ----

    /// Apply `mv` atomically: either every piece of session state moves on or
    /// none does
    fn play(&mut self, mv: &CanonicalMove) -> GameResult<String> {
        let step = advance(&self.position, mv)?;
        let san = step.san.clone();
        self.commit(step);
        Ok(san)
    }

    fn commit(&mut self, step: SessionAdvance) {
        info!("[SESSION] {} plays {} ({})", step.mover.name(), step.san, step.played);

        if !self.history.record(&step.san, step.mover) {
            warn!("[SESSION] {} not recorded: Black moved with no open entry", step.san);
        }
        for capture in &step.captures {
            debug!("[SESSION] Captured {:?} {:?}", capture.color, capture.piece_type);
        }
        self.captured.extend(step.captures);
        self.position = step.position;

        self.selection.clear();
        self.stalled_fen = None;
        self.best_move = None;
        if self.show_eval {
            self.evaluation.depth = 0;
        }

        if self.position.is_game_over() {
            info!("[SESSION] Game over: {}", self.status_text());
        }
    }

    // ---- Suggestions ----

    /// Hand out a suggestion request if the side to move is AI-controlled
    ///
    /// Returns `None` while another request is in flight, once the game is
    /// over, and after the backend failed at this exact position until
    /// [`GameSession::request_ai_move`] clears the stall.
    pub fn next_suggestion_request(&mut self) -> Option<PendingSuggestion> {
        if self.pending.is_some() || self.position.is_game_over() {
            return None;
        }
        let side = self.position.side_to_move();
        if !self.ai.players.is_ai(side) {
            return None;
        }
        let fen = self.position.fen();
        if self.stalled_fen.as_deref() == Some(fen.as_str()) {
            return None;
        }

        let request = PendingSuggestion::new(fen, self.ai.difficulty.depth(), side);
        info!(
            "[AI] Requesting move for {} at depth {} ({})",
            side.name(),
            request.depth,
            request.id
        );
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Resolve the in-flight request with the backend's answer
    pub fn apply_suggestion(
        &mut self,
        request: &PendingSuggestion,
        suggestion: Option<Suggestion>,
    ) -> SuggestionOutcome {
        match &self.pending {
            Some(pending) if pending.id == request.id => self.pending = None,
            _ => {
                warn!("[AI] Discarding response to superseded request {}", request.id);
                return SuggestionOutcome::Stale;
            }
        }

        let fen = self.position.fen();
        if request.fen != fen {
            warn!("[AI] Discarding response issued for {}", request.fen);
            return SuggestionOutcome::Stale;
        }

        let Some(suggestion) = suggestion else {
            warn!("[AI] No suggestion received; waiting for a retry");
            self.stalled_fen = Some(fen);
            return SuggestionOutcome::NoSuggestion;
        };

        if let Some(eval) = suggestion.eval {
            self.last_ai_eval = Some(eval);
        }

        match normalize(&suggestion.payload, &self.position).and_then(|mv| self.play(&mv)) {
            Ok(san) => SuggestionOutcome::Applied { san },
            Err(err) => {
                warn!("[AI] Suggestion rejected: {}", err);
                self.stalled_fen = Some(fen);
                SuggestionOutcome::Rejected(err)
            }
        }
    }

    /// Manual trigger: allow a new request at a position where the backend
    /// previously had nothing to offer
    pub fn request_ai_move(&mut self) {
        if self.stalled_fen.take().is_some() {
            info!("[AI] Retrying suggestion");
        }
    }

    pub fn pending_request(&self) -> Option<&PendingSuggestion> {
        self.pending.as_ref()
    }

    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    // ---- Analysis ----

    /// Take an analysis stream message; non-evaluation messages are ignored
    pub fn apply_analysis(&mut self, message: &AnalysisMessage) {
        if !message.is_evaluation() {
            return;
        }
        self.evaluation = EvaluationSample::from_message(message);
        if self.show_best_move {
            self.best_move = BestMoveArrow::from_message(message).or(self.best_move);
        }
    }

    /// Whether the analysis stream should be open
    pub fn eval_stream_wanted(&self) -> bool {
        self.show_eval || self.show_best_move
    }

    // ---- Settings and game control ----

    /// Reset position, ledger, captures and evaluation
    ///
    /// Player assignment, difficulty, display toggles and orientation persist.
    /// An in-flight request is orphaned and its response will be discarded.
    pub fn new_game(&mut self) {
        info!("[SESSION] New game");
        self.position = GamePosition::new();
        self.history.clear();
        self.captured.clear();
        self.selection.clear();
        self.pending = None;
        self.stalled_fen = None;
        self.evaluation = EvaluationSample::default();
        self.best_move = None;
        self.last_ai_eval = None;
    }

    pub fn flip(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Switch `color` between human and AI control
    pub fn toggle_ai(&mut self, color: PieceColor) -> PlayerType {
        let now = self.ai.players.toggle(color);
        info!("[AI] {} is now {}", color.name(), now.label());
        self.stalled_fen = None;
        if now == PlayerType::Ai && self.position.side_to_move() == color {
            self.selection.clear();
        }
        now
    }

    /// Set search depth; only 2, 3 and 4 are accepted
    pub fn set_ai_depth(&mut self, depth: u8) -> bool {
        match AIDifficulty::from_depth(depth) {
            Some(difficulty) => {
                self.ai.difficulty = difficulty;
                self.stalled_fen = None;
                info!("[AI] Depth set to {}", depth);
                true
            }
            None => {
                warn!("[AI] Unsupported depth {}", depth);
                false
            }
        }
    }

    pub fn set_show_eval(&mut self, show: bool) {
        self.show_eval = show;
    }

    pub fn set_show_best_move(&mut self, show: bool) {
        self.show_best_move = show;
        if !show {
            self.best_move = None;
        }
    }

    // ---- View accessors ----

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.position.fen()
    }

    pub fn highlights(&self) -> HashMap<Square, SquareHighlight> {
        self.selection.highlights()
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selection.selected_square
    }

    /// Arrow endpoints, only while best-move display is on
    pub fn best_move_arrow(&self) -> Option<BestMoveArrow> {
        self.best_move.filter(|_| self.show_best_move)
    }

    pub fn history(&self) -> &[MoveHistoryEntry] {
        self.history.entries()
    }

    pub fn captured_by(&self, capturer: PieceColor) -> &[CapturedPiece] {
        self.captured.captured_by(capturer)
    }

    pub fn material_difference(&self) -> Option<(PieceColor, u32)> {
        self.captured.material_difference()
    }

    /// Current evaluation sample, only while evaluation display is on
    pub fn evaluation(&self) -> Option<&EvaluationSample> {
        self.show_eval.then_some(&self.evaluation)
    }

    pub fn last_ai_eval(&self) -> Option<f64> {
        self.last_ai_eval
    }

    pub fn orientation(&self) -> BoardOrientation {
        self.orientation
    }

    pub fn ai_config(&self) -> &AIConfig {
        &self.ai
    }

    pub fn status_text(&self) -> String {
        if self.pending.is_some() {
            return "AI is thinking...".to_string();
        }
        if self.position.is_draw() {
            return "Draw!".to_string();
        }
        if let Some(winner) = self.position.winner() {
            return format!("{} wins!", winner.name());
        }
        let side = self.position.side_to_move();
        format!("{} to move ({})", side.name(), self.ai.players.for_color(side).label())
    }
}
