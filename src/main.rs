use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use callsight::cli::{Cli, Command};
use callsight::config::CallsightConfig;
use callsight::ui::{self, PollProgress};
use callsight::{AnalysisClient, JobId, OrchestrationError, Orchestrator};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<OrchestrationError>() {
            Some(orch_err) => eprintln!("error: {}", orch_err.user_message()),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "callsight=debug" } else { "callsight=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CallsightConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.poll_interval_ms = interval_ms.max(1);
    }

    let client = AnalysisClient::with_base_url(config.base_url.clone());
    let orchestrator = Orchestrator::with_budgets(
        client,
        config.transcription_budget(),
        config.analysis_budget(),
    );

    match cli.command {
        Command::Text { text, sync } => {
            let report = if sync {
                orchestrator.analyze_text_sync(&text).await?
            } else {
                let progress = PollProgress::start("transcript");
                let result = orchestrator
                    .analyze_text(&text, |snapshot| progress.update(snapshot))
                    .await;
                finish_progress(&progress, &result);
                result?
            };
            ui::print_report(&report);
        }
        Command::Audio { path, sync } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read audio file {}", path.display()))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("recording.wav")
                .to_string();

            let report = if sync {
                orchestrator.analyze_audio_sync(bytes, &filename).await?
            } else {
                let progress = PollProgress::start(&filename);
                let result = orchestrator
                    .analyze_audio(bytes, &filename, |snapshot| progress.update(snapshot))
                    .await;
                finish_progress(&progress, &result);
                result?
            };
            ui::print_report(&report);
        }
        Command::Status { id } => {
            let snapshot = orchestrator.status(&JobId::new(id)).await?;
            println!("status: {}", snapshot.status);
            if let Some(duration) = snapshot.duration {
                println!("duration: {duration:.1}s");
            }
            println!(
                "prebuilt result: {}",
                if snapshot.prebuilt_result.is_some() { "available" } else { "pending" }
            );
            println!(
                "langchain result: {}",
                if snapshot.langchain_result.is_some() { "available" } else { "pending" }
            );
        }
    }

    Ok(())
}

fn finish_progress<T>(progress: &PollProgress, result: &Result<T, OrchestrationError>) {
    match result {
        Ok(_) => progress.finish_success(),
        Err(err) => progress.finish_failure(&err.user_message()),
    }
}
