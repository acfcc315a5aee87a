//! Terminal rendering of events and snapshots.

use std::io::Write;

use chrono::{DateTime, Utc};
use multitimer_core::storage::DisplayConfig;
use multitimer_core::{Event, TimerSnapshot};

/// `HH:MM:SS`, days folded into hours. Partial seconds round up so a fresh
/// one-hour timer reads `01:00:00` and the display hits zero only at completion.
pub fn format_hms(remaining_ms: u64) -> String {
    let secs = remaining_ms.div_ceil(1000);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

pub fn progress_bar(progress_pct: f64, width: usize) -> String {
    let filled = ((progress_pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub struct Output {
    json: bool,
    display: DisplayConfig,
}

impl Output {
    pub fn new(json: bool, display: DisplayConfig) -> Self {
        Self { json, display }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// One board row.
    pub fn row(&self, position: usize, snap: &TimerSnapshot) -> String {
        let mut line = format!(
            "{position:>2}  {}  {:<16}  {:<9}  {:<9}  {}",
            snap.id.short(),
            snap.title,
            snap.target_summary,
            snap.phase,
            format_hms(snap.remaining_ms),
        );
        if self.display.show_progress {
            line.push_str(&format!(
                "  {} {:>5.1}%",
                progress_bar(snap.progress_pct, self.display.progress_bar_width as usize),
                snap.progress_pct
            ));
        }
        if let Some(draft) = &snap.title_draft {
            line.push_str(&format!("  (editing title: \"{draft}\")"));
        } else if let Some(message) = &snap.validation {
            line.push_str(&format!("  ! {message}"));
        }
        line
    }

    /// Print the board; JSON mode emits one `StateSnapshot` event per timer.
    pub fn board(&self, snapshots: Vec<TimerSnapshot>, at: DateTime<Utc>) {
        if self.json {
            for snapshot in snapshots {
                self.json_line(&Event::StateSnapshot { snapshot, at });
            }
            return;
        }
        if snapshots.is_empty() {
            println!("no timers (try: add)");
            return;
        }
        for (i, snap) in snapshots.into_iter().enumerate() {
            println!("{}", self.row(i + 1, &snap));
        }
    }

    /// Redraw a single progress line in place.
    pub fn progress(&self, snap: &TimerSnapshot) {
        if self.json {
            return;
        }
        print!("\r{}", self.row(1, snap));
        let _ = std::io::stdout().flush();
    }

    pub fn event(&self, event: &Event) {
        if self.json {
            self.json_line(event);
            return;
        }
        match event {
            Event::TimerCreated { id, title, .. } => println!("added {} \"{title}\"", id.short()),
            Event::TimerStarted { id, target, .. } => println!(
                "started {} (until {})",
                id.short(),
                target.with_timezone(&chrono::Local).format("%H:%M:%S")
            ),
            Event::TimerResumed { id, remaining_ms, .. } => {
                println!("resumed {} ({} left)", id.short(), format_hms(*remaining_ms))
            }
            Event::TimerPaused { id, remaining_ms, .. } => {
                println!("paused {} ({} left)", id.short(), format_hms(*remaining_ms))
            }
            Event::TimerTick { .. } | Event::StateSnapshot { .. } => {}
            Event::TimerCompleted { title, .. } => println!("\x07{title} alert!"),
            Event::TimerReset { id, .. } => println!("reset {}", id.short()),
            Event::TimerDeleted { id, .. } => println!("deleted {}", id.short()),
            Event::ConfigEdited {
                id, validation, ..
            } => match validation {
                Some(message) => println!("updated {} ! {message}", id.short()),
                None => println!("updated {}", id.short()),
            },
            Event::TitleEditStarted { id, draft, .. } => {
                println!("editing title of {} (draft \"{draft}\")", id.short())
            }
            Event::TitleEditCommitted { id, title, .. } => {
                println!("renamed {} to \"{title}\"", id.short())
            }
            Event::TitleEditCancelled { id, .. } => println!("title edit of {} cancelled", id.short()),
        }
    }

    fn json_line<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!("cannot serialize output: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_folds_days_into_hours() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3_600_000), "01:00:00");
        assert_eq!(format_hms(3_599_001), "01:00:00");
        assert_eq!(format_hms(61_000), "00:01:01");
        assert_eq!(format_hms(26 * 3_600_000), "26:00:00");
    }

    #[test]
    fn progress_bar_is_bounded() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(50.0, 4), "[##--]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
        assert_eq!(progress_bar(-3.0, 4), "[----]");
    }
}
