use std::path::PathBuf;

use anyhow::Context;
use chess_session::cli::{self, Input, HELP};
use chess_session::core::{load_settings, settings_path};
use chess_session::networking::SuggestionClient;
use chess_session::{GameSession, SessionCommand, SessionDriver};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Play chess in the terminal against a remote move-suggestion backend
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Suggestion backend root URL, overrides settings and environment
    #[arg(long)]
    api_url: Option<String>,

    /// Do not open the analysis stream
    #[arg(long)]
    no_eval: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = args.settings.unwrap_or_else(settings_path);
    let mut settings = load_settings(&path);
    settings.apply_env_overrides();
    if let Some(url) = args.api_url {
        settings.api_base_url = url;
    }
    if args.no_eval {
        settings.show_eval = false;
        settings.show_best_move = false;
    }

    let client = SuggestionClient::new(&settings.api_base_url, settings.request_timeout())
        .context("building suggestion client")?;
    info!("[SESSION] Suggestion backend: {}", client.endpoint());

    let session = GameSession::new()
        .with_ai_config(settings.ai_config())
        .with_display(settings.show_eval, settings.show_best_move);
    let driver = SessionDriver::new(session, client, settings.eval_stream_config());

    let (commands, receiver) = mpsc::channel(32);
    let input = tokio::spawn(read_commands(commands));

    let mut last_frame = String::new();
    let finished = driver
        .run(receiver, |session| {
            let frame = cli::render(session);
            if frame != last_frame {
                println!("{frame}");
                last_frame = frame;
            }
        })
        .await;

    input.abort();
    info!("[SESSION] Final position: {}", finished.fen());
    Ok(())
}

/// Forward stdin lines to the driver until EOF or `quit`
async fn read_commands(commands: mpsc::Sender<SessionCommand>) {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("[INPUT] stdin failed: {}", err);
                break;
            }
        };
        match cli::parse_line(&line) {
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Commands(batch)) => {
                for command in batch {
                    let quit = command == SessionCommand::Shutdown;
                    if commands.send(command).await.is_err() || quit {
                        return;
                    }
                }
            }
            Err(err) => println!("{err}"),
        }
    }
    let _ = commands.send(SessionCommand::Shutdown).await;
}
