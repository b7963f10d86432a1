//! Terminal output — poll spinner and the final comparison view.
//!
//! Uses `indicatif` for the spinner shown while phases are polling and
//! `console` for colored output. Nothing here is load-bearing: the
//! orchestrator works identically with no progress attached.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::job::StatusSnapshot;
use crate::normalize::{EngineResult, EngineSlot};
use crate::orchestrator::CallReport;

/// Render an agent score for display. Engines disagree on scale: scores in
/// (0, 1] are fractions of 100, anything else is already on a 0–10 scale.
pub fn format_agent_score(score: f64) -> String {
    if score > 0.0 && score <= 1.0 {
        format!("{}/100", (score * 100.0).round())
    } else {
        format!("{}/10", score.round())
    }
}

/// Spinner shown while a job is polled, updated from each snapshot.
pub struct PollProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
}

impl PollProgress {
    pub fn start(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("SUBMITTED: {label}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Reflect the latest snapshot: current status plus which engine slots
    /// have already landed.
    pub fn update(&self, snapshot: &StatusSnapshot) {
        let engines = match (
            snapshot.prebuilt_result.is_some(),
            snapshot.langchain_result.is_some(),
        ) {
            (true, true) => " (prebuilt ✓, langchain ✓)",
            (true, false) => " (prebuilt ✓, langchain …)",
            (false, true) => " (prebuilt …, langchain ✓)",
            (false, false) => "",
        };
        self.pb.set_message(format!("{}{engines}", snapshot.status));
    }

    pub fn finish_success(&self) {
        self.pb.finish_and_clear();
        println!("  {} Analysis complete", self.green.apply_to("✓"));
    }

    pub fn finish_failure(&self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {} {message}", self.red.apply_to("✗"));
    }
}

/// Print the normalized comparison side by side, one section per engine.
pub fn print_report(report: &CallReport) {
    let header = Style::new().cyan().bold();
    println!();
    println!("{}", header.apply_to(format!("─── Call {} ───", report.job_id)));
    if let Some(duration) = report.duration {
        println!("duration: {duration:.1}s");
    }

    print_engine("prebuilt", &report.comparison.prebuilt);
    print_engine("langchain", &report.comparison.langchain);
}

fn print_engine(name: &str, slot: &EngineSlot) {
    let header = Style::new().bold();
    println!();
    println!("{}", header.apply_to(format!("[{name}]")));
    match slot {
        EngineSlot::Result(result) => print_engine_result(result),
        EngineSlot::Error(error) => {
            let red = Style::new().red();
            println!("  {} {}", red.apply_to("engine error:"), error.message);
        }
    }
}

fn print_engine_result(result: &EngineResult) {
    println!("  intent:      {} ({:.0}%)", result.intent, result.intent_confidence * 100.0);
    println!("  sentiment:   {} / {}", result.sentiment, result.emotion);
    println!("  tone:        {}", result.tone);
    println!("  agent score: {}", format_agent_score(result.agent_score));
    println!("  summary:     {}", result.summary);
    if let Some(flags) = &result.flags {
        println!(
            "  flags:       fraud={} callback={} escalation={}",
            flags.fraud_risk, flags.need_callback, flags.escalation_required
        );
    }
    if !result.requirements.is_empty() {
        println!("  requirements:");
        for req in &result.requirements {
            let priority = req.priority.as_deref().unwrap_or("-");
            println!("    - {} ({priority})", req.kind);
        }
    }
    if !result.follow_up_tasks.is_empty() {
        println!("  follow-ups:  {}", result.follow_up_tasks.len());
    }
}
