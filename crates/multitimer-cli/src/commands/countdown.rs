use clap::Args;
use multitimer_core::{ClockTime, Config, Event, RelativeDuration, Ticker, TimerPatch};

use super::{runtime, RunOptions};

#[derive(Args, Debug)]
pub struct CountdownArgs {
    /// Count down for a duration (e.g. 90s, 25m, 1h)
    #[arg(long = "in", value_name = "DURATION", conflicts_with = "at")]
    pub duration: Option<RelativeDuration>,
    /// Count down to a time of day, today (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<ClockTime>,
    /// Timer title shown in the alert
    #[arg(long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub run: RunOptions,
}

pub fn run(args: CountdownArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    runtime()?.block_on(countdown(args, config))
}

async fn countdown(args: CountdownArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = args.run.board(config);
    let output = args.run.output(config);
    let now = chrono::Local::now();

    let created = board.add(&now);
    let id = created.timer_id();
    output.event(&created);

    let mut patch = match (args.at, args.duration) {
        (Some(at), _) => TimerPatch::at(at),
        (None, Some(duration)) => TimerPatch::after(duration),
        (None, None) => TimerPatch::default(),
    };
    patch.title = args.title;
    if !patch.is_empty() {
        board.edit(&id, &patch, &now)?;
    }

    if let Some(started) = board.start(&id, &now)? {
        output.event(&started);
    }

    let mut ticker = Ticker::schedule(args.run.interval(config));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            instant = ticker.next() => {
                let Some(instant) = instant else { break };
                for event in board.tick(&instant) {
                    if matches!(event, Event::TimerCompleted { .. }) && !output.is_json() {
                        println!();
                    }
                    output.event(&event);
                }
                if !board.has_running() {
                    ticker.cancel();
                } else if let Ok(snap) = board.snapshot(&id, &instant) {
                    output.progress(&snap);
                }
            }
            _ = &mut ctrl_c => {
                ticker.cancel();
                if !output.is_json() {
                    println!();
                }
                let deleted = board.delete(&id, &chrono::Local::now())?;
                output.event(&deleted);
                tracing::debug!("countdown cancelled by user");
                break;
            }
        }
    }
    Ok(())
}
