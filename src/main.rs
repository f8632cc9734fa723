use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crosstalk::{
    merge_tracks, normalize_track, parse_recognizer_file, render_transcript, session_track_files,
    write_text_artifact, DeepSeekClient, DeepSeekConfig, MergedDocument, MergedTranscript,
    NormalizedTrack, RenderConfig,
};

#[derive(Parser)]
#[command(name = "crosstalk")]
#[command(author, version, about = "Merge multi-track session transcripts and summarize them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge per-track recognizer outputs into one speaker-labeled transcript
    Merge {
        #[command(flatten)]
        merge: MergeArgs,
    },

    /// Merge, then generate a session summary via the DeepSeek API
    Summarize {
        #[command(flatten)]
        merge: MergeArgs,

        /// Output file for the generated summary
        #[arg(long)]
        summary_output: PathBuf,

        /// Extra context handed to the summarizer (campaign name, cast, ...)
        #[arg(long)]
        context: Option<String>,
    },

    /// Inspect a session without writing artifacts
    Analyze {
        /// Session directory of per-track JSON files, or a single file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct MergeArgs {
    /// Session directory of per-track JSON files, or a single file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the rendered transcript
    #[arg(short, long)]
    output: PathBuf,

    /// Optional output file for the machine-readable merged document (JSON)
    #[arg(long)]
    machine_output: Option<PathBuf>,

    /// Display name for a speaker id, as `id=Name` (repeatable)
    #[arg(long = "label", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Render only start timestamps instead of full ranges
    #[arg(long)]
    start_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(id, name)| (id.trim().to_string(), name.trim().to_string()))
        .filter(|(id, name)| !id.is_empty() && !name.is_empty())
        .ok_or_else(|| format!("expected `id=Name`, got {:?}", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { merge } => {
            setup_logging(merge.verbose);
            run_merge(&merge).await.map(|_| ())
        }
        Commands::Summarize {
            merge,
            summary_output,
            context,
        } => {
            setup_logging(merge.verbose);
            run_summarize(&merge, &summary_output, context.as_deref()).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_session(&input).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Load, normalize, and merge a session. Each track is parsed and
/// normalized on its own blocking worker; the merge itself runs on one
/// thread since it orders across all tracks.
async fn load_and_merge(input: &Path) -> Result<MergedTranscript> {
    let files = if input.is_dir() {
        session_track_files(input)?
    } else {
        vec![input.to_path_buf()]
    };
    info!("Loading {} track(s) from {:?}", files.len(), input);

    let mut workers = Vec::with_capacity(files.len());
    for path in files {
        workers.push(tokio::task::spawn_blocking(move || -> Result<NormalizedTrack> {
            let raw = parse_recognizer_file(&path)?;
            let track = normalize_track(&raw.speaker_id, &raw.segments);
            debug!(
                speaker_id = %track.speaker_id,
                segments = track.segments.len(),
                dropped = track.dropped.total(),
                "normalized track"
            );
            Ok(track)
        }));
    }

    let mut tracks = Vec::with_capacity(workers.len());
    for worker in workers {
        tracks.push(worker.await.context("Normalization worker panicked")??);
    }

    let merged = merge_tracks(&tracks).context("Failed to merge tracks")?;
    if merged.stats.dropped.total() > 0 {
        info!(
            "Dropped {} segment(s) during normalization ({} malformed, {} empty, {} intra-track overlaps)",
            merged.stats.dropped.total(),
            merged.stats.dropped.malformed,
            merged.stats.dropped.empty_text,
            merged.stats.dropped.intra_track_overlap
        );
    }
    Ok(merged)
}

async fn run_merge(args: &MergeArgs) -> Result<String> {
    let merged = load_and_merge(&args.input).await?;

    let config = RenderConfig {
        labels: args.labels.iter().cloned().collect::<HashMap<_, _>>(),
        start_only: args.start_only,
    };
    let rendered = render_transcript(&merged, &config);

    write_text_artifact(&args.output, &rendered)?;
    info!("Transcript written to {:?}", args.output);

    if let Some(machine_path) = &args.machine_output {
        MergedDocument::from_transcript(&merged).write_json(machine_path)?;
        info!("Merged document written to {:?}", machine_path);
    }

    Ok(rendered)
}

async fn run_summarize(
    args: &MergeArgs,
    summary_output: &Path,
    context: Option<&str>,
) -> Result<()> {
    // Fail on a missing API key before doing any work
    let api_config = DeepSeekConfig::from_env()?;

    let rendered = run_merge(args).await?;

    info!("Generating summary with {}", api_config.model);
    let client = DeepSeekClient::new(api_config);
    let summary = client
        .summarize(&rendered, context.unwrap_or_default())
        .await?;

    write_text_artifact(summary_output, &summary)?;
    info!("Summary written to {:?}", summary_output);

    println!();
    println!("{}", "=".repeat(50));
    println!("SESSION SUMMARY:");
    println!("{}", "=".repeat(50));
    println!("{}", summary);

    Ok(())
}

async fn analyze_session(input: &Path) -> Result<()> {
    let merged = load_and_merge(input).await?;

    println!("Session Analysis");
    println!("================");
    println!("Tracks: {}", merged.stats.track_count);
    println!("Entries: {}", merged.len());
    println!("Duration: {:.1}s", merged.duration_ms() as f64 / 1000.0);
    println!(
        "Dropped segments: {} ({} malformed, {} empty, {} intra-track overlaps)",
        merged.stats.dropped.total(),
        merged.stats.dropped.malformed,
        merged.stats.dropped.empty_text,
        merged.stats.dropped.intra_track_overlap
    );
    println!();

    println!("Overlap");
    println!("-------");
    let group_count = merged.group_sizes().len();
    println!("Overlap groups: {}", group_count);
    println!(
        "Entries overlapping another speaker: {}",
        merged.overlapping_entry_count()
    );
    println!();

    println!("Speaker Statistics");
    println!("------------------");
    for speaker in &merged.speakers {
        let entries: Vec<_> = merged
            .entries
            .iter()
            .filter(|e| e.segment.speaker_id == *speaker)
            .collect();
        let talk_ms: u64 = entries.iter().map(|e| e.segment.duration_ms()).sum();
        let scored: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.segment.confidence)
            .collect();

        if scored.is_empty() {
            println!(
                "{}: {} segments, {:.1}s of speech",
                speaker,
                entries.len(),
                talk_ms as f64 / 1000.0
            );
        } else {
            println!(
                "{}: {} segments, {:.1}s of speech, avg conf {:.2}",
                speaker,
                entries.len(),
                talk_ms as f64 / 1000.0,
                scored.iter().sum::<f64>() / scored.len() as f64
            );
        }
    }

    Ok(())
}
