//! Text driver for xiangqi practice.
//!
//! Reads one command per line from stdin and plays the engine's replies.
//! The human plays red from the bottom of the board. Engine searches run as
//! spawned tasks, so input keeps being read while the engine thinks.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use xiangqi_ai::PlayerStats;
use xiangqi_core::{Move, Square};
use xiangqi_practice::commentary::{fetch_commentary, CommentaryRequest, CommentaryService, LocalCommentary};
use xiangqi_practice::dispatch::SearchHandle;
use xiangqi_practice::{
    AiOutcome, AiReply, ClickOutcome, FinishedGame, PracticeConfig, PracticeError, PracticeSession,
    PressOutcome, HUMAN,
};
use xiangqi_rating::{JsonFileStore, RatingStore};

/// Xiangqi practice - play red against a rating-scaled engine.
#[derive(Parser)]
#[command(name = "xiangqi-practice")]
#[command(about = "Play xiangqi against a rating-scaled engine")]
struct Args {
    /// Path to the TOML configuration file [default: xiangqi.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the engine's move variance
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding the persisted rating
    #[arg(long)]
    rating_file: Option<PathBuf>,
}

const HELP: &str = "\
commands:
  x1,y1 x2,y2    move a piece (also: move x1,y1 x2,y2)
  select x,y     select a piece and list its targets
  board          show the board
  resign         resign (press twice to confirm)
  restart        restart the game (press twice to confirm)
  new            start a fresh game
  review         show the last finished game's review
  replay N       show the boards around move N of the last game
  practice N     practice the last game from before move N
  rating         show rating and rank
  quit           leave";

struct Driver<S: RatingStore> {
    session: PracticeSession<S>,
    commentary: Arc<dyn CommentaryService>,
    commentary_timeout: Duration,
}

impl<S: RatingStore> Driver<S> {
    fn handle(&mut self, line: &str) -> bool {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "quit" | "exit" => return false,
            "help" => println!("{}", HELP),
            "board" => println!("{}", self.session.controller().board()),
            "rating" => println!(
                "rating {} ({}), engine level {}",
                self.session.rating(),
                self.session.rank(),
                self.session.skill()
            ),
            "select" => match parse_square(rest) {
                Some(sq) => {
                    let outcome = self.session.click(sq);
                    self.report_click(outcome);
                }
                None => println!("expected a square like 4,9"),
            },
            "move" => self.play_text(rest),
            "resign" => match self.session.press_resign(Instant::now()) {
                PressOutcome::Armed(_) => println!("press resign again to confirm"),
                PressOutcome::Resigned(game) => self.report_finished(&game),
                _ => println!("the game is already over"),
            },
            "restart" => match self.session.press_restart(Instant::now()) {
                PressOutcome::Armed(_) => println!("press restart again to confirm"),
                _ => println!("game restarted\n{}", self.session.controller().board()),
            },
            "new" => {
                self.session.new_game();
                println!("{}", self.session.controller().board());
            }
            "review" => self.review(),
            "replay" => match rest.parse::<usize>() {
                Ok(index) => match self.session.replay(index) {
                    Ok(frame) => {
                        println!("move {}: {}", index, frame.record);
                        println!("before:\n{}", frame.before);
                        println!("after:\n{}", frame.after);
                    }
                    Err(e) => println!("{}", e),
                },
                Err(_) => println!("expected a move index"),
            },
            "practice" => match rest.parse::<usize>() {
                Ok(index) => match self.session.practice_from(index) {
                    Ok(()) => {
                        println!("practicing from before move {}", index);
                        println!("{}", self.session.controller().board());
                    }
                    Err(e) => println!("{}", e),
                },
                Err(_) => println!("expected a move index"),
            },
            _ => self.play_text(line),
        }
        true
    }

    fn play_text(&mut self, text: &str) {
        let Some(mov) = Move::parse(text) else {
            println!("unrecognized command; type help");
            return;
        };
        let outcome = self.session.play_move(mov);
        let moved = matches!(outcome, ClickOutcome::Moved { .. });
        self.report_click(outcome);
        if moved {
            self.comment();
        }
    }

    /// Spawns commentary on the player's latest move. It prints whenever it
    /// arrives and never holds up the game.
    fn comment(&self) {
        let Some(record) = self.session.controller().history().last() else {
            return;
        };
        let request = CommentaryRequest::new(self.session.controller().board(), record.description.clone());
        let service = Arc::clone(&self.commentary);
        let limit = self.commentary_timeout;
        tokio::spawn(async move {
            println!("coach: {}", fetch_commentary(service, request, limit).await);
        });
    }

    fn on_reply(&mut self, reply: Result<AiReply, PracticeError>) -> anyhow::Result<()> {
        match self.session.apply_ai_reply(reply?)? {
            AiOutcome::Moved { record, finished } => {
                println!("engine: {}", record);
                if let Some(game) = finished {
                    self.report_finished(&game);
                }
                println!("{}", self.session.controller().board());
            }
            AiOutcome::GameOver(game) => self.report_finished(&game),
            AiOutcome::Stale => {}
        }
        Ok(())
    }

    fn report_click(&self, outcome: ClickOutcome) {
        match outcome {
            ClickOutcome::Selected { from, targets } => {
                let targets: Vec<String> = targets.iter().map(Square::to_string).collect();
                println!("selected {}: {}", from, targets.join(" "));
            }
            ClickOutcome::Moved { record, finished } => {
                println!("you: {}", record);
                if let Some(game) = finished {
                    self.report_finished(&game);
                }
            }
            ClickOutcome::Rejected { .. } => println!("illegal move"),
            ClickOutcome::Ignored => println!("not your turn"),
        }
    }

    fn report_finished(&self, game: &FinishedGame) {
        println!(
            "game over: {} wins ({:?}) after {} moves",
            game.winner,
            game.reason,
            game.history.len()
        );
        if let Some(report) = self.session.last_report() {
            println!(
                "rating {} -> {} ({:+}), {}",
                report.rating.before,
                report.rating.after,
                report.rating.change,
                self.session.rank()
            );
            if !report.saved {
                println!("warning: the new rating could not be saved");
            }
        }
        println!("type review, replay N or practice N");
    }

    fn review(&self) {
        let Some(report) = self.session.last_report() else {
            println!("no finished game yet");
            return;
        };
        for m in report.analysis.iter().filter(|m| m.color == HUMAN) {
            println!("{:>3} {:<40} {:?} (-{})", m.index, m.description, m.quality, m.loss);
        }
        let stats = PlayerStats::from_moves(&report.analysis, HUMAN);
        println!(
            "{} moves: {} best, {} inaccuracies, {} mistakes, {} blunders, avg loss {:.1}",
            stats.total_moves, stats.best_moves, stats.inaccuracies, stats.mistakes, stats.blunders, stats.avg_loss
        );
        let critical = self
            .session
            .review_index()
            .ok()
            .and_then(|index| report.game.history.get(index).map(|r| (index, r)));
        if let Some((index, record)) = critical {
            println!("critical move {}: {}", index, record);
        }
    }
}

fn parse_square(text: &str) -> Option<Square> {
    let (x, y) = text.split_once(',')?;
    Square::new(x.trim().parse().ok()?, y.trim().parse().ok()?)
}

/// Waits for the outstanding search, or forever when there is none.
async fn next_reply(pending: &mut Option<SearchHandle>) -> Result<AiReply, PracticeError> {
    match pending {
        Some(handle) => handle
            .await
            .map_err(|e| PracticeError::SearchTask(e.to_string()))?,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(PracticeConfig::config_path);
    let mut config = PracticeConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(path) = args.rating_file {
        config.rating_file = path;
    }
    tracing::info!(?config, "configuration loaded");

    let store = JsonFileStore::new(&config.rating_file);
    let session = PracticeSession::new(&config, store).context("starting practice session")?;
    let mut driver = Driver {
        session,
        commentary: Arc::new(LocalCommentary),
        commentary_timeout: config.commentary_timeout(),
    };

    println!(
        "rating {} ({}), engine level {}",
        driver.session.rating(),
        driver.session.rank(),
        driver.session.skill()
    );
    println!("{}", driver.session.controller().board());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<SearchHandle> = None;
    loop {
        if pending.is_none() {
            pending = driver.session.start_ai_turn();
        }
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                driver.session.expire_confirm(Instant::now());
                if !driver.handle(line.trim()) {
                    break;
                }
            }
            reply = next_reply(&mut pending) => {
                pending = None;
                driver.on_reply(reply)?;
            }
        }
    }
    Ok(())
}
