mod cli;
mod config;
mod llm;
mod report;
mod research;
mod scholar;

pub const USER_AGENT: &str = concat!("scholar/", env!("CARGO_PKG_VERSION"));

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::{info, warn};

use cli::Cli;
use config::Config;
use llm::{ClaudeClient, MistralClient};
use research::{Answerer, Research};
use scholar::ScholarClient;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Exit status for a run interrupted with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scholar=info".parse()?),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
    let claude = ClaudeClient::new(http.clone(), &config.claude);
    let mistral = MistralClient::new(http.clone(), &config.mistral);
    let scholar = ScholarClient::new(http, &config.serpapi);
    let answerer = Answerer::select(cli.provider, &claude, &mistral);

    let research = Research {
        expander: &claude,
        generator: &mistral,
        search: &scholar,
        answerer: &answerer,
        options: cli.aggregate_options(),
    };

    info!(query = %cli.query, provider = cli.provider.display_name(), "research started");

    let outcome = tokio::select! {
        outcome = research.run(&cli.query) => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("research cancelled");
            eprintln!("cancelled");
            return Ok(ExitCode::from(EXIT_CANCELLED));
        }
    };

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        areas = report.research_areas.len(),
        questions = report.related_questions.len(),
        results = report.results.len(),
        "research complete"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::format_report(&report, cli.details));
    }

    Ok(ExitCode::SUCCESS)
}
