//! Async session driver
//!
//! Owns a [`GameSession`] on a single task and multiplexes user commands,
//! finished suggestion requests and analysis messages with `tokio::select!`.
//! Each event is applied to the session to completion before the next one is
//! looked at, so no two moves ever interleave.

use shakmaty::Square;
use shared::protocol::AnalysisMessage;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::game::ai::{PendingSuggestion, Suggestion};
use crate::game::session::GameSession;
use crate::game::types::PieceColor;
use crate::networking::{EvalStream, EvalStreamConfig, SuggestionClient};

/// Commands sent to the driver by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Click(Square),
    DragStart(Square),
    Drop { from: Square, to: Square },
    Flip,
    NewGame,
    ToggleAi(PieceColor),
    SetAiDepth(u8),
    ShowEval(bool),
    ShowBestMove(bool),
    /// Ask the backend again after it had nothing to offer
    RetryAi,
    Shutdown,
}

type SuggestionTask = (PendingSuggestion, Option<Suggestion>);

/// Runs a session against the remote backends
pub struct SessionDriver {
    session: GameSession,
    client: SuggestionClient,
    eval_config: EvalStreamConfig,
}

impl SessionDriver {
    pub fn new(session: GameSession, client: SuggestionClient, eval_config: EvalStreamConfig) -> Self {
        Self {
            session,
            client,
            eval_config,
        }
    }

    /// Process events until `Shutdown` or until every command sender is gone
    ///
    /// `on_update` sees the session after every processed event. Returns the
    /// final session state.
    pub async fn run<F>(mut self, mut commands: mpsc::Receiver<SessionCommand>, mut on_update: F) -> GameSession
    where
        F: FnMut(&GameSession),
    {
        let (analysis_tx, mut analysis_rx) = mpsc::unbounded_channel::<AnalysisMessage>();
        let mut eval: Option<EvalStream> = None;
        let mut analysed_fen = String::new();
        let mut suggestions: JoinSet<SuggestionTask> = JoinSet::new();

        info!("[SESSION] Driver started");
        loop {
            self.dispatch_suggestion(&mut suggestions);
            self.sync_eval_stream(&mut eval, &mut analysed_fen, &analysis_tx).await;
            on_update(&self.session);

            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(command) => self.handle_command(command),
                },
                Some(joined) = suggestions.join_next(), if !suggestions.is_empty() => match joined {
                    Ok((request, suggestion)) => {
                        let outcome = self.session.apply_suggestion(&request, suggestion);
                        debug!("[AI] Request {} resolved: {:?}", request.id, outcome);
                    }
                    Err(err) => {
                        warn!("[AI] Suggestion task failed: {}", err);
                        self.suggestion_task_failed(!suggestions.is_empty());
                    }
                },
                Some(message) = analysis_rx.recv() => self.session.apply_analysis(&message),
            }
        }

        if let Some(stream) = eval.take() {
            stream.close().await;
        }
        suggestions.abort_all();
        info!("[SESSION] Driver stopped");
        self.session
    }

    fn handle_command(&mut self, command: SessionCommand) {
        debug!("[INPUT] {:?}", command);
        match command {
            SessionCommand::Click(square) => {
                self.session.click(square);
            }
            SessionCommand::DragStart(square) => {
                self.session.drag_start(square);
            }
            SessionCommand::Drop { from, to } => {
                self.session.drop(from, to);
            }
            SessionCommand::Flip => self.session.flip(),
            SessionCommand::NewGame => self.session.new_game(),
            SessionCommand::ToggleAi(color) => {
                self.session.toggle_ai(color);
            }
            SessionCommand::SetAiDepth(depth) => {
                self.session.set_ai_depth(depth);
            }
            SessionCommand::ShowEval(show) => self.session.set_show_eval(show),
            SessionCommand::ShowBestMove(show) => self.session.set_show_best_move(show),
            SessionCommand::RetryAi => self.session.request_ai_move(),
            SessionCommand::Shutdown => {}
        }
    }

    /// Start a suggestion request if the session hands one out
    ///
    /// Requests orphaned by a new game keep running; their answers come back
    /// as stale and are dropped by the session.
    fn dispatch_suggestion(&mut self, suggestions: &mut JoinSet<SuggestionTask>) {
        let Some(request) = self.session.next_suggestion_request() else {
            return;
        };
        let client = self.client.clone();
        suggestions.spawn(async move {
            let suggestion = client.request_move(&request).await;
            (request, suggestion)
        });
    }

    /// A suggestion task died without an answer
    ///
    /// The failed task may be an orphan from an earlier game, so the pending
    /// request is only resolved when no other task could still answer it.
    fn suggestion_task_failed(&mut self, others_in_flight: bool) {
        if others_in_flight {
            return;
        }
        if let Some(request) = self.session.pending_request().cloned() {
            self.session.apply_suggestion(&request, None);
        }
    }

    /// Open, update or close the analysis stream to match the session
    async fn sync_eval_stream(
        &self,
        eval: &mut Option<EvalStream>,
        analysed_fen: &mut String,
        analysis_tx: &mpsc::UnboundedSender<AnalysisMessage>,
    ) {
        let wanted = self.session.eval_stream_wanted();
        let fen = self.session.fen();

        match eval.take() {
            Some(stream) if !wanted => stream.close().await,
            Some(stream) => {
                if *analysed_fen == fen || stream.update_position(&fen) {
                    *eval = Some(stream);
                } else {
                    warn!("[EVAL] Stream task ended; reopening");
                    *eval = Some(EvalStream::open(self.eval_config.clone(), fen.clone(), analysis_tx.clone()));
                }
                *analysed_fen = fen;
            }
            None if wanted => {
                *eval = Some(EvalStream::open(self.eval_config.clone(), fen.clone(), analysis_tx.clone()));
                *analysed_fen = fen;
            }
            None => {}
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}
