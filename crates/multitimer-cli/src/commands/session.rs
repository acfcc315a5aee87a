//! Interactive multi-timer session.
//!
//! Commands are read line by line from stdin while every timer on the board
//! keeps ticking. When stdin closes, the session lingers until no timer is
//! running, so scripted input like `add --in 5m` / `start 1` works.

use clap::{Args, Parser, Subcommand};
use multitimer_core::{
    ClockTime, Config, Event, InputMode, MemoryStore, RelativeDuration, Ticker, TimerBoard,
    TimerPatch,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{runtime, RunOptions};
use crate::display::Output;

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(flatten)]
    pub run: RunOptions,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Add a timer (defaults from config)
    Add {
        #[arg(long)]
        title: Option<String>,
        /// Count down for a duration (e.g. 90s, 25m, 1h)
        #[arg(long = "in", value_name = "DURATION", conflicts_with = "at")]
        duration: Option<RelativeDuration>,
        /// Count down to a time of day, today (HH:MM)
        #[arg(long, value_name = "HH:MM")]
        at: Option<ClockTime>,
    },
    /// Show all timers
    #[command(visible_alias = "ls")]
    List,
    /// Start or resume a timer
    Start { timer: String },
    /// Pause a running timer
    Pause { timer: String },
    /// Return a timer to idle
    Reset { timer: String },
    /// Remove a timer
    #[command(visible_alias = "rm")]
    Delete { timer: String },
    /// Set a relative duration
    In { timer: String, duration: RelativeDuration },
    /// Set an absolute time of day
    At { timer: String, time: ClockTime },
    /// Switch between `at` and `in` without changing the stored values
    Mode { timer: String, mode: InputMode },
    /// Begin a title edit; with TITLE, rename in one step
    Rename { timer: String, title: Option<String> },
    /// Replace the open title draft
    Draft { timer: String, text: String },
    /// Save the open title draft
    Commit { timer: String },
    /// Discard the open title draft
    Cancel { timer: String },
    /// Leave the session
    #[command(visible_alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(args: SessionArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    runtime()?.block_on(session(args, config))
}

async fn session(args: SessionArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = args.run.board(config);
    let output = args.run.output(config);
    let mut ticker = Ticker::schedule(args.run.interval(config));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Flow::Quit = handle_line(&mut board, &output, &line) {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            instant = ticker.next() => {
                let Some(instant) = instant else { break };
                for event in board.tick(&instant) {
                    if output.is_json() || matches!(event, Event::TimerCompleted { .. }) {
                        output.event(&event);
                    }
                }
                if !stdin_open && !board.has_running() {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    ticker.cancel();
    Ok(())
}

fn handle_line(board: &mut TimerBoard<MemoryStore>, output: &Output, line: &str) -> Flow {
    let Some(words) = shlex::split(line) else {
        eprintln!("error: unbalanced quotes");
        return Flow::Continue;
    };
    if words.is_empty() {
        return Flow::Continue;
    }
    let parsed = match Line::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            let _ = e.print();
            return Flow::Continue;
        }
    };
    match dispatch(board, output, parsed.command) {
        Ok(flow) => flow,
        Err(e) => {
            if output.is_json() {
                println!("{}", serde_json::json!({ "type": "Error", "message": e.to_string() }));
            } else {
                eprintln!("error: {e}");
            }
            Flow::Continue
        }
    }
}

fn dispatch(
    board: &mut TimerBoard<MemoryStore>,
    output: &Output,
    command: SessionCommand,
) -> multitimer_core::error::Result<Flow> {
    let now = chrono::Local::now();
    let mut events: Vec<Event> = Vec::new();

    match command {
        SessionCommand::Add { title, duration, at } => {
            let created = board.add(&now);
            let id = created.timer_id();
            events.push(created);
            let mut patch = match (at, duration) {
                (Some(at), _) => TimerPatch::at(at),
                (None, Some(duration)) => TimerPatch::after(duration),
                (None, None) => TimerPatch::default(),
            };
            patch.title = title;
            if !patch.is_empty() {
                events.push(board.edit(&id, &patch, &now)?);
            }
        }
        SessionCommand::List => output.board(board.snapshots(&now), now.with_timezone(&chrono::Utc)),
        SessionCommand::Start { timer } => {
            let id = board.resolve(&timer)?;
            events.extend(board.start(&id, &now)?);
        }
        SessionCommand::Pause { timer } => {
            let id = board.resolve(&timer)?;
            events.extend(board.pause(&id, &now)?);
        }
        SessionCommand::Reset { timer } => {
            let id = board.resolve(&timer)?;
            events.extend(board.reset(&id, &now)?);
        }
        SessionCommand::Delete { timer } => {
            let id = board.resolve(&timer)?;
            events.push(board.delete(&id, &now)?);
        }
        SessionCommand::In { timer, duration } => {
            let id = board.resolve(&timer)?;
            events.push(board.edit(&id, &TimerPatch::after(duration), &now)?);
        }
        SessionCommand::At { timer, time } => {
            let id = board.resolve(&timer)?;
            events.push(board.edit(&id, &TimerPatch::at(time), &now)?);
        }
        SessionCommand::Mode { timer, mode } => {
            let id = board.resolve(&timer)?;
            events.push(board.edit(&id, &TimerPatch::mode(mode), &now)?);
        }
        SessionCommand::Rename { timer, title } => {
            let id = board.resolve(&timer)?;
            events.push(board.begin_title_edit(&id, &now)?);
            if let Some(title) = title {
                board.update_title_draft(&id, title)?;
                events.push(board.commit_title_edit(&id, &now)?);
            }
        }
        SessionCommand::Draft { timer, text } => {
            let id = board.resolve(&timer)?;
            board.update_title_draft(&id, text)?;
        }
        SessionCommand::Commit { timer } => {
            let id = board.resolve(&timer)?;
            events.push(board.commit_title_edit(&id, &now)?);
        }
        SessionCommand::Cancel { timer } => {
            let id = board.resolve(&timer)?;
            events.push(board.cancel_title_edit(&id, &now)?);
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    }

    for event in &events {
        output.event(event);
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use multitimer_core::storage::DisplayConfig;
    use multitimer_core::{CoreError, RecordingNotifier, TimerPhase, TimerStore};

    fn board() -> TimerBoard<MemoryStore> {
        TimerBoard::new(MemoryStore::new(), RecordingNotifier::new())
    }

    fn output() -> Output {
        Output::new(true, DisplayConfig::default())
    }

    fn run(board: &mut TimerBoard<MemoryStore>, line: &str) -> Result<Flow, CoreError> {
        let words = shlex::split(line).unwrap();
        let parsed = Line::try_parse_from(words).unwrap();
        dispatch(board, &output(), parsed.command)
    }

    #[test]
    fn add_with_quoted_title_and_duration() {
        let mut board = board();
        run(&mut board, "add --title \"green tea\" --in 3m").unwrap();
        let snap = &board.snapshots(&chrono::Local::now())[0];
        assert_eq!(snap.title, "green tea");
        assert_eq!(snap.phase, TimerPhase::Idle);
    }

    #[test]
    fn start_and_pause_by_position() {
        let mut board = board();
        run(&mut board, "add").unwrap();
        run(&mut board, "start 1").unwrap();
        let id = board.resolve("1").unwrap();
        assert_eq!(board.phase(&id), Some(TimerPhase::Running));
        run(&mut board, "pause 1").unwrap();
        assert_eq!(board.phase(&id), Some(TimerPhase::Paused));
    }

    #[test]
    fn editing_running_timer_is_an_error() {
        let mut board = board();
        run(&mut board, "add").unwrap();
        run(&mut board, "start 1").unwrap();
        assert!(run(&mut board, "in 1 5m").is_err());
    }

    #[test]
    fn rename_in_one_step() {
        let mut board = board();
        run(&mut board, "add").unwrap();
        run(&mut board, "rename 1 laundry").unwrap();
        let id = board.resolve("1").unwrap();
        assert_eq!(board.store().get(&id).unwrap().title, "laundry");
    }

    #[test]
    fn two_phase_rename() {
        let mut board = board();
        run(&mut board, "add").unwrap();
        run(&mut board, "rename 1").unwrap();
        assert!(run(&mut board, "start 1").is_err());
        run(&mut board, "draft 1 soup").unwrap();
        run(&mut board, "commit 1").unwrap();
        let id = board.resolve("1").unwrap();
        assert_eq!(board.store().get(&id).unwrap().title, "soup");
    }

    #[test]
    fn quit_ends_session() {
        let mut board = board();
        assert!(matches!(run(&mut board, "quit"), Ok(Flow::Quit)));
    }

    #[test]
    fn unknown_timer_is_an_error() {
        let mut board = board();
        assert!(run(&mut board, "start 4").is_err());
    }
}
