//! Console rendering of the engine's transfer events.

use std::time::Duration;

use humansize::{BINARY, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use sluice_engine::{MirrorError, TransferObserver};

pub struct ConsoleObserver {
    bar: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl TransferObserver for ConsoleObserver {
    fn on_file_start(&mut self, remote_path: &str, total: Option<u64>) {
        self.clear();
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{bar:32}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .expect("static template parses")
                    .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{msg} {spinner} {bytes}")
                        .expect("static template parses"),
                );
                bar
            }
        };
        let name = remote_path.rsplit('/').next().unwrap_or(remote_path);
        bar.set_message(name.to_owned());
        self.bar = Some(bar);
    }

    fn on_progress(&mut self, position: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(position);
        }
    }

    fn on_file_done(&mut self, remote_path: &str, bytes: u64, elapsed: Duration) {
        self.clear();
        println!(
            "  {remote_path}  {} in {}",
            format_size(bytes, BINARY),
            format_elapsed(elapsed)
        );
    }

    fn on_file_failed(&mut self, _remote_path: &str, _error: &MirrorError) {
        // The engine logs the failure; just take the stale bar down.
        self.clear();
    }
}

/// Format a wall-clock duration as `HH:MM:SS.ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0) as u64;
    let minutes = ((total % 3600.0) / 60.0) as u64;
    let seconds = total % 60.0;
    format!("{hours:02}:{minutes:02}:{seconds:05.2}")
}
