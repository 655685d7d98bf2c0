use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use matcher::parsing::{parse_job, parse_resume};
use matcher::skills::SkillVocabulary;
use matcher::state::AppState;
use matcher::{Config, JobDocument, ResumeDocument, ScoringWeights};

/// Score one or more résumés against a job description.
///
/// Inputs ending in `.json` are read as already-structured documents; anything
/// else is parsed as plain text.
#[derive(Debug, Parser)]
#[command(name = "matcher", version)]
struct Args {
    /// Job description file
    #[arg(long)]
    job: PathBuf,

    /// Résumé files
    #[arg(long = "resume", required = true, num_args = 1..)]
    resumes: Vec<PathBuf>,

    /// Fixed weights as "semantic,skills,experience" instead of the adaptive defaults
    #[arg(long)]
    weights: Option<ScoringWeights>,

    /// Report the capped weighted sum without distribution shaping
    #[arg(long)]
    raw_score: bool,

    /// Keep only the best N results
    #[arg(long)]
    top: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the JSON results
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(config)?;
    let engine = (*state.engine).clone().with_normalization(!args.raw_score);

    let job = load_job(&args.job, &state.vocabulary)?;
    let resumes = args
        .resumes
        .iter()
        .map(|path| load_resume(path, &state.vocabulary))
        .collect::<Result<Vec<_>>>()?;

    info!(
        resumes = resumes.len(),
        provider = engine.provider_name().unwrap_or("none"),
        "Matching"
    );

    let mut results = engine
        .batch_match(&resumes, &job, args.weights.as_ref())
        .await;
    if let Some(top) = args.top {
        results.truncate(top);
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_json<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON document {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_job(path: &Path, vocabulary: &SkillVocabulary) -> Result<JobDocument> {
    let raw = read_text(path)?;
    if is_json(path) {
        read_json(path, &raw)
    } else {
        Ok(parse_job(&raw, vocabulary))
    }
}

fn load_resume(path: &Path, vocabulary: &SkillVocabulary) -> Result<ResumeDocument> {
    let raw = read_text(path)?;
    if is_json(path) {
        read_json(path, &raw)
    } else {
        Ok(parse_resume(&raw, vocabulary))
    }
}
