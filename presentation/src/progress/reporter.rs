//! Progress reporting for dispatches

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use switchboard_application::DispatchProgress;
use switchboard_domain::{Backend, TargetMode};

/// Reports progress during a dispatch with a spinner and reply counter
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} [{pos}/{len}] {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn target_display_name(target: &TargetMode) -> String {
        match target {
            TargetMode::All => "Asking all models".to_string(),
            TargetMode::Single(backend) => format!("Asking {}", backend),
        }
    }

    fn lock_bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_dispatch_start(&self, target: &TargetMode, backends: usize) {
        let pb = self.multi.add(ProgressBar::new(backends as u64));
        pb.set_style(Self::style());
        pb.set_prefix(Self::target_display_name(target));
        pb.set_message("waiting...");
        pb.enable_steady_tick(Duration::from_millis(100));

        *self.lock_bar() = Some(pb);
    }

    fn on_reply(&self, backend: Backend, success: bool) {
        if let Some(pb) = self.lock_bar().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), backend)
            } else {
                format!("{} {}", "x".red(), backend)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self, _target: &TargetMode) {
        if let Some(pb) = self.lock_bar().take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    // A cancelled dispatch never reports completion
    fn drop(&mut self) {
        if let Some(pb) = self.lock_bar().take() {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl DispatchProgress for SimpleProgress {
    fn on_dispatch_start(&self, target: &TargetMode, backends: usize) {
        eprintln!(
            "{} {} ({} {})",
            "->".cyan(),
            ProgressReporter::target_display_name(target).bold(),
            backends,
            if backends == 1 { "backend" } else { "backends" }
        );
    }

    fn on_reply(&self, backend: Backend, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), backend);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), backend);
        }
    }

    fn on_dispatch_complete(&self, _target: &TargetMode) {
        eprintln!();
    }
}

/// Progress output picked for the current stderr
pub enum ConsoleProgress {
    Spinner(ProgressReporter),
    Plain(SimpleProgress),
    Silent,
}

impl ConsoleProgress {
    /// Spinner on a terminal, plain lines when stderr is redirected
    pub fn new(show: bool) -> Self {
        Self::select(show, std::io::stderr().is_terminal())
    }

    fn select(show: bool, terminal: bool) -> Self {
        match (show, terminal) {
            (false, _) => ConsoleProgress::Silent,
            (true, true) => ConsoleProgress::Spinner(ProgressReporter::new()),
            (true, false) => ConsoleProgress::Plain(SimpleProgress),
        }
    }
}

impl DispatchProgress for ConsoleProgress {
    fn on_dispatch_start(&self, target: &TargetMode, backends: usize) {
        match self {
            ConsoleProgress::Spinner(p) => p.on_dispatch_start(target, backends),
            ConsoleProgress::Plain(p) => p.on_dispatch_start(target, backends),
            ConsoleProgress::Silent => {}
        }
    }

    fn on_reply(&self, backend: Backend, success: bool) {
        match self {
            ConsoleProgress::Spinner(p) => p.on_reply(backend, success),
            ConsoleProgress::Plain(p) => p.on_reply(backend, success),
            ConsoleProgress::Silent => {}
        }
    }

    fn on_dispatch_complete(&self, target: &TargetMode) {
        match self {
            ConsoleProgress::Spinner(p) => p.on_dispatch_complete(target),
            ConsoleProgress::Plain(p) => p.on_dispatch_complete(target),
            ConsoleProgress::Silent => {}
        }
    }
}
