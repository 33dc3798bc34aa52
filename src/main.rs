use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use meeting_digest::llm::minimum_topics;
use meeting_digest::text::{
    format_mmss, last_line_timestamp_seconds, last_timestamp, line_timestamp,
};
use meeting_digest::{
    chunk_stats, compose_minutes, generate_minutes, load_transcript, parse_participant,
    split_text, summarize_transcript, write_json, AnthropicClient, AnthropicConfig, DigestError,
    HumanMinutes, HumanSummary, MeetingInfo, MinutesConfig, Participant, RequestConfig,
    SummaryConfig,
};

#[derive(Parser)]
#[command(name = "meeting-digest")]
#[command(author, version, about = "Meeting transcript summarization pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a long transcript fragment by fragment into one structured document
    Summarize {
        /// Input transcript (`[MM:SS]` text, or segments JSON with a .json extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the structured summary (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a Markdown rendering
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Participant, as "Name" or "Name <email>" (repeatable)
        #[arg(short, long = "participant")]
        participants: Vec<String>,

        /// Maximum fragment size in characters
        #[arg(long, default_value = "8000")]
        max_chars: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Produce meeting minutes in a single request
    Minutes {
        /// Input transcript (`[MM:SS]` text, or segments JSON with a .json extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the minutes record (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a Markdown rendering
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Participant, as "Name" or "Name <email>" (repeatable)
        #[arg(short, long = "participant")]
        participants: Vec<String>,

        /// Stored meeting title, used when none is generated
        #[arg(long)]
        title: Option<String>,

        /// Stored meeting identifier; a fresh one is assigned when omitted
        #[arg(long)]
        meeting_id: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a transcript would be fragmented, without calling the service
    Chunks {
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum fragment size in characters
        #[arg(long, default_value = "8000")]
        max_chars: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            input,
            output,
            markdown,
            participants,
            max_chars,
            verbose,
        } => {
            setup_logging(verbose);
            summarize(input, output, markdown, participants, max_chars).await
        }
        Commands::Minutes {
            input,
            output,
            markdown,
            participants,
            title,
            meeting_id,
            verbose,
        } => {
            setup_logging(verbose);
            minutes(input, output, markdown, participants, title, meeting_id).await
        }
        Commands::Chunks {
            input,
            max_chars,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_chunks(input, max_chars)
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn parse_roster(raw: &[String]) -> Vec<Participant> {
    raw.iter().filter_map(|p| parse_participant(p)).collect()
}

fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(value, path)?;
            info!("Output written to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

async fn summarize(
    input: PathBuf,
    output: Option<PathBuf>,
    markdown: Option<PathBuf>,
    participants: Vec<String>,
    max_chars: usize,
) -> Result<()> {
    if max_chars == 0 {
        bail!("--max-chars must be greater than zero");
    }

    info!("Loading transcript from {:?}", input);
    let transcript = load_transcript(&input).context("Failed to load input transcript")?;
    let names: Vec<String> = parse_roster(&participants)
        .into_iter()
        .map(|p| p.name)
        .collect();

    let client = AnthropicClient::new(AnthropicConfig::from_env()?);
    info!("Using model {}", client.model());

    let mut config = SummaryConfig::default();
    config.chunk.max_chars = max_chars;

    let document = match summarize_transcript(&client, &transcript, &names, &config).await {
        Ok(document) => document,
        Err(DigestError::NoTopics) => {
            bail!("No main points could be generated for this transcript")
        }
        Err(e) => return Err(e).context("Summarization failed"),
    };

    info!(
        "Complete: {} main points, {} tasks",
        document.topic_count(),
        document.tasks_and_objectives.len()
    );

    emit_json(&document, output.as_deref())?;
    if let Some(path) = markdown {
        HumanSummary::new(&document).write_file(&path)?;
        info!("Markdown written to {:?}", path);
    }

    Ok(())
}

async fn minutes(
    input: PathBuf,
    output: Option<PathBuf>,
    markdown: Option<PathBuf>,
    participants: Vec<String>,
    title: Option<String>,
    meeting_id: Option<String>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = load_transcript(&input).context("Failed to load input transcript")?;
    let uploaded_at = std::fs::metadata(&input)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    let meeting = MeetingInfo {
        id: meeting_id,
        title,
        uploaded_at,
        transcript,
        participants: parse_roster(&participants),
    };
    let names: Vec<String> = meeting.participants.iter().map(|p| p.name.clone()).collect();

    let client = AnthropicClient::new(AnthropicConfig::from_env()?);
    info!("Using model {}", client.model());

    let config = MinutesConfig::default();
    let document = generate_minutes(&client, &meeting.transcript, &names, &config).await;
    let record = compose_minutes(&meeting, &document, &config.default_title);

    info!(
        "Complete: {} key points, {} tasks",
        record.key_points.len(),
        record.tasks_and_objectives.len()
    );

    emit_json(&record, output.as_deref())?;
    if let Some(path) = markdown {
        HumanMinutes::new(&record).write_file(&path)?;
        info!("Markdown written to {:?}", path);
    }

    Ok(())
}

fn analyze_chunks(input: PathBuf, max_chars: usize) -> Result<()> {
    if max_chars == 0 {
        bail!("--max-chars must be greater than zero");
    }

    info!("Analyzing transcript from {:?}", input);
    let transcript = load_transcript(&input).context("Failed to load input transcript")?;
    let fragments = split_text(&transcript, max_chars);
    let stats = chunk_stats(&fragments);

    println!("Transcript Fragments");
    println!("====================");
    println!("Fragment limit: {} chars", max_chars);
    println!("Fragments: {}", stats.fragments);
    println!("Total chars: {}", stats.total_chars);
    println!("Largest fragment: {} chars", stats.largest_chars);
    println!(
        "Last timestamp: {}",
        last_timestamp(&transcript)
            .map(format_mmss)
            .unwrap_or_else(|| "none".to_string())
    );

    let duration = last_line_timestamp_seconds(&transcript);
    let request = RequestConfig::default();
    println!("Estimated duration: {} min", duration / 60);
    println!(
        "Minimum main points: {}",
        minimum_topics(
            duration / 60,
            request.min_topics_floor,
            request.minutes_per_topic
        )
    );
    println!();

    for (i, fragment) in fragments.iter().enumerate() {
        let first = fragment
            .split_whitespace()
            .find_map(line_timestamp)
            .map(format_mmss)
            .unwrap_or_else(|| "--:--".to_string());
        println!(
            "Fragment {}: {} chars, starts at {}",
            i + 1,
            fragment.chars().count(),
            first
        );
    }

    Ok(())
}
