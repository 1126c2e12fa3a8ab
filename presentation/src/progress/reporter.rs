//! Progress reporting while a turn is generated

use colored::Colorize;
use flowgrid_application::GenerationProgress;
use flowgrid_domain::{GenerationResult, ValidationOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner that follows the generate / validate / repair cycle
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn attempt_label(attempt: u32, max_attempts: u32) -> String {
        if attempt == 1 {
            "Generating".to_string()
        } else {
            format!("Repair {}/{}", attempt - 1, max_attempts - 1)
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

// A failed model call never reaches `on_complete`
impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl GenerationProgress for ProgressReporter {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(Self::attempt_label(attempt, max_attempts));
        pb.set_message("waiting for the model...");
    }

    fn on_model_reply(&self, _attempt: u32, has_diagram: bool) {
        self.with_spinner(|pb| {
            if has_diagram {
                pb.set_message("validating diagram...");
            } else {
                pb.set_message("reply received");
            }
        });
    }

    fn on_validation(&self, attempt: u32, outcome: &ValidationOutcome) {
        self.with_spinner(|pb| {
            if outcome.is_valid() {
                pb.set_message(format!("{} valid", "v".green()));
            } else {
                pb.println(format!(
                    "  {} attempt {}: {}",
                    "x".red(),
                    attempt,
                    outcome
                        .error_detail()
                        .and_then(|detail| detail.lines().next())
                        .unwrap_or("invalid diagram")
                ));
            }
        });
    }

    fn on_complete(&self, _result: &GenerationResult) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl GenerationProgress for SimpleProgress {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::attempt_label(attempt, max_attempts).bold()
        );
    }

    fn on_validation(&self, attempt: u32, outcome: &ValidationOutcome) {
        if outcome.is_valid() {
            eprintln!("  {} attempt {} valid", "v".green(), attempt);
        } else {
            eprintln!(
                "  {} attempt {} invalid: {}",
                "x".red(),
                attempt,
                outcome.error_detail().unwrap_or("invalid diagram")
            );
        }
    }
}
