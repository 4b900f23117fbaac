//! Terminal front-end: command parsing and text rendering of a session

use std::fmt::Write as _;

use shakmaty::{File, Rank, Square};
use thiserror::Error;

use crate::game::resources::SquareHighlight;
use crate::game::session::GameSession;
use crate::game::types::{BoardOrientation, PieceColor};
use crate::game::SessionCommand;

pub const HELP: &str = "\
commands:
  click <sq>          select a piece or move the selected one
  drag <sq>           start dragging the piece on <sq>
  drop <from> <to>    drop a dragged piece
  move <from><to>     shorthand for two clicks, e.g. move e2e4
  flip                flip the board
  new                 start a new game
  ai <white|black>    toggle AI control of a side
  depth <2|3|4>       set AI search depth
  eval <on|off>       show or hide the evaluation
  best <on|off>       show or hide the best-move arrow
  retry               ask the AI again after it gave no move
  quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument '{0}'")]
    InvalidArgument(String),
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Commands(Vec<SessionCommand>),
    Help,
}

pub fn parse_line(line: &str) -> Result<Input, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Commands(Vec::new()));
    };
    let mut arg = |name: &'static str| words.next().ok_or(CommandError::MissingArgument(name));

    let commands = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Input::Help),
        "click" => vec![SessionCommand::Click(square(arg("click")?)?)],
        "drag" => vec![SessionCommand::DragStart(square(arg("drag")?)?)],
        "drop" => {
            let from = square(arg("drop")?)?;
            let to = square(arg("drop")?)?;
            vec![SessionCommand::Drop { from, to }]
        }
        "move" => {
            let text = arg("move")?;
            let (from, to) = text
                .get(0..2)
                .zip(text.get(2..4))
                .filter(|_| text.len() == 4)
                .ok_or_else(|| CommandError::InvalidArgument(text.to_string()))?;
            vec![
                SessionCommand::Click(square(from)?),
                SessionCommand::Click(square(to)?),
            ]
        }
        "flip" => vec![SessionCommand::Flip],
        "new" => vec![SessionCommand::NewGame],
        "ai" => vec![SessionCommand::ToggleAi(color(arg("ai")?)?)],
        "depth" => {
            let text = arg("depth")?;
            let depth = text
                .parse()
                .map_err(|_| CommandError::InvalidArgument(text.to_string()))?;
            vec![SessionCommand::SetAiDepth(depth)]
        }
        "eval" => vec![SessionCommand::ShowEval(switch(arg("eval")?)?)],
        "best" => vec![SessionCommand::ShowBestMove(switch(arg("best")?)?)],
        "retry" => vec![SessionCommand::RetryAi],
        "quit" | "exit" => vec![SessionCommand::Shutdown],
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Input::Commands(commands))
}

fn square(text: &str) -> Result<Square, CommandError> {
    text.to_ascii_lowercase()
        .parse()
        .map_err(|_| CommandError::InvalidArgument(text.to_string()))
}

fn color(text: &str) -> Result<PieceColor, CommandError> {
    match text.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(PieceColor::White),
        "black" | "b" => Ok(PieceColor::Black),
        _ => Err(CommandError::InvalidArgument(text.to_string())),
    }
}

fn switch(text: &str) -> Result<bool, CommandError> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArgument(text.to_string())),
    }
}

/// Board, status, history, captures and evaluation as plain text
pub fn render(session: &GameSession) -> String {
    let mut out = String::new();
    let highlights = session.highlights();
    let position = session.position();

    let (ranks, files): (Vec<Rank>, Vec<File>) = match session.orientation() {
        BoardOrientation::White => (Rank::ALL.into_iter().rev().collect(), File::ALL.to_vec()),
        BoardOrientation::Black => (Rank::ALL.to_vec(), File::ALL.into_iter().rev().collect()),
    };

    for rank in &ranks {
        let _ = write!(out, "{} ", rank.char());
        for file in &files {
            let sq = Square::from_coords(*file, *rank);
            let piece = position.piece_at(sq).map_or('.', |piece| {
                let letter = piece.piece_type.to_char();
                match piece.color {
                    PieceColor::White => letter.to_ascii_uppercase(),
                    PieceColor::Black => letter,
                }
            });
            let cell = match highlights.get(&sq) {
                Some(SquareHighlight::Selected) => format!("[{piece}]"),
                Some(SquareHighlight::MoveTarget) => format!("({piece})"),
                None => format!(" {piece} "),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for file in &files {
        let _ = write!(out, " {} ", file.char());
    }
    out.push('\n');

    let _ = writeln!(out, "{}", session.status_text());

    if let Some(sample) = session.evaluation() {
        let _ = writeln!(
            out,
            "eval {} (depth {}, white {:.0}%)",
            sample.label(session.orientation()),
            sample.depth,
            sample.white_bar_percent()
        );
    }
    if let Some(arrow) = session.best_move_arrow() {
        let _ = writeln!(out, "best {}{}", arrow.from, arrow.to);
    }
    if let Some(eval) = session.last_ai_eval() {
        let _ = writeln!(out, "ai eval {eval:.2}");
    }

    for color in PieceColor::ALL {
        let taken: String = session
            .captured_by(color)
            .iter()
            .map(|piece| piece.piece_type.to_char())
            .collect();
        if !taken.is_empty() {
            let _ = writeln!(out, "{} took: {}", color.name(), taken);
        }
    }
    if let Some((leader, amount)) = session.material_difference() {
        let _ = writeln!(out, "{} +{}", leader.name(), amount);
    }

    for entry in session.history() {
        let _ = writeln!(out, "{}. {} {}", entry.move_number, entry.white, entry.black);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_shorthand() {
        assert_eq!(
            parse_line("move e2e4"),
            Ok(Input::Commands(vec![
                SessionCommand::Click(Square::E2),
                SessionCommand::Click(Square::E4),
            ]))
        );
        assert!(matches!(parse_line("move e2"), Err(CommandError::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("drop g1 f3"),
            Ok(Input::Commands(vec![SessionCommand::Drop {
                from: Square::G1,
                to: Square::F3
            }]))
        );
        assert_eq!(
            parse_line("ai white"),
            Ok(Input::Commands(vec![SessionCommand::ToggleAi(PieceColor::White)]))
        );
        assert_eq!(parse_line("eval off"), Ok(Input::Commands(vec![SessionCommand::ShowEval(false)])));
        assert_eq!(parse_line("depth 3"), Ok(Input::Commands(vec![SessionCommand::SetAiDepth(3)])));
        assert_eq!(parse_line("quit"), Ok(Input::Commands(vec![SessionCommand::Shutdown])));
        assert_eq!(parse_line("help"), Ok(Input::Help));
        assert_eq!(parse_line("   "), Ok(Input::Commands(Vec::new())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("castle"), Err(CommandError::Unknown("castle".to_string())));
        assert_eq!(parse_line("click"), Err(CommandError::MissingArgument("click")));
        assert!(matches!(parse_line("click z9"), Err(CommandError::InvalidArgument(_))));
        assert!(matches!(parse_line("best maybe"), Err(CommandError::InvalidArgument(_))));
    }

    #[test]
    fn test_render_start_position() {
        let session = GameSession::new();
        let text = render(&session);
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8  r  n  b  q  k  b  n  r ");
        assert!(text.contains("White to move (human)"));
    }

    #[test]
    fn test_render_marks_selection() {
        let mut session = GameSession::new();
        session.click(Square::G1);
        let text = render(&session);
        assert!(text.contains("[N]"));
        assert!(text.contains("(.)"));
    }

    #[test]
    fn test_render_flipped() {
        let mut session = GameSession::new();
        session.flip();
        let first = render(&session).lines().next().unwrap().to_string();
        assert_eq!(first, "1  R  N  B  K  Q  B  N  R ");
    }
}
