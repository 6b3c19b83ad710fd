//! Progress reporting for voting sessions

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tripvote_application::{StageSnapshot, VotingProgressNotifier};
use tripvote_domain::{Stage, StageResults};

/// Reports the local participant's progress with a bar per stage
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<(Stage, ProgressBar)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Print a line above the bars without tearing them.
    pub fn println(&self, line: impl AsRef<str>) {
        let _ = self.multi.println(line.as_ref());
    }

    fn with_bar(&self, stage: Stage, total: usize, f: impl FnOnce(&ProgressBar)) {
        let Ok(mut slot) = self.stage_bar.lock() else {
            return;
        };
        let stale = !matches!(slot.as_ref(), Some((s, _)) if *s == stage);
        if stale {
            if let Some((_, old)) = slot.take() {
                old.finish_and_clear();
            }
            let bar = self.multi.add(ProgressBar::new(total as u64));
            bar.set_style(Self::stage_style());
            bar.set_prefix(stage.display_name().to_string());
            *slot = Some((stage, bar));
        }
        if let Some((_, bar)) = slot.as_ref() {
            bar.set_length(total as u64);
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingProgressNotifier for ProgressReporter {
    fn on_vote_recorded(&self, stage: Stage, voted: usize, total: usize) {
        self.with_bar(stage, total, |bar| bar.set_position(voted as u64));
    }

    fn on_participant_finished(&self, stage: Stage) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some((s, bar)) = slot.as_ref()
            && *s == stage
        {
            bar.set_message(format!("{}", "done, waiting for the group".yellow()));
        }
    }

    fn on_stage_advanced(&self, from: Stage, to: Stage) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some((_, bar)) = slot.take()
        {
            bar.finish_with_message(format!("{}", "decided".green()));
        }
        self.println(format!(
            "{} {} → {}",
            "->".cyan(),
            from.display_name(),
            ConsoleFormatter::stage_label(to).bold()
        ));
    }

    fn on_snapshot(&self, snapshot: &StageSnapshot) {
        let (done, total) = snapshot.done_count();
        if let Ok(slot) = self.stage_bar.lock()
            && let Some((stage, bar)) = slot.as_ref()
            && *stage == snapshot.stage
        {
            bar.set_message(format!("group {}/{} done", done, total));
        }
    }

    fn on_trip_finished(&self, _results: &[StageResults]) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some((_, bar)) = slot.take()
        {
            bar.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl VotingProgressNotifier for SimpleProgress {
    fn on_vote_recorded(&self, stage: Stage, voted: usize, total: usize) {
        println!("  {} {} {}/{}", "v".green(), stage.display_name(), voted, total);
    }

    fn on_participant_finished(&self, stage: Stage) {
        println!(
            "{} Done with {}, waiting for the group",
            "->".cyan(),
            stage.display_name().bold()
        );
    }

    fn on_stage_advanced(&self, from: Stage, to: Stage) {
        println!(
            "{} {} decided, now {}",
            "->".cyan(),
            from.display_name(),
            ConsoleFormatter::stage_label(to).bold()
        );
    }

    fn on_snapshot(&self, snapshot: &StageSnapshot) {
        print!("{}", ConsoleFormatter::snapshot(snapshot));
    }
}
