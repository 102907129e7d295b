//! KDP CLI
//!
//! Command-line front end for the Knowledge Decay Predictor learning history.

mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use kdp_core::{
    filter_entries, hours_remaining, score_entries, score_subtopics, BucketFilter, CaptureEvent,
    CapturePipeline, CapturePolicy, HistoryStats, HistoryStore, ImportMode, InsertOutcome,
    MemoryBucket, ScoredEntry, SqliteStore, REVIEW_THRESHOLD,
};
use tracing_subscriber::EnvFilter;

use crate::config::KdpConfig;

/// KDP - Knowledge Decay Predictor CLI
#[derive(Parser)]
#[command(name = "kdp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track what you learn and see what is fading")]
#[command(long_about = "Tracks study sessions and estimates how much of each topic is still remembered.\n\nRetention follows an exponential forgetting curve whose half-life shrinks with topic complexity.")]
struct Cli {
    /// Data directory (overrides KDP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a study session
    Capture {
        /// Page title
        #[arg(long)]
        title: String,
        /// Page URL
        #[arg(long)]
        url: String,
        /// Page text
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read page text from a file
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Seconds spent on the page
        #[arg(long, default_value = "0")]
        time_spent: u64,
        /// Skip sessions that don't meet the capture thresholds
        #[arg(long)]
        enforce_policy: bool,
    },

    /// List learned topics with their current memory strength
    List {
        /// all, strong, review or forgotten
        #[arg(long, default_value = "all")]
        filter: BucketFilter,
        /// Maximum number of topics shown
        #[arg(long)]
        limit: Option<usize>,
        /// Show grouped subtopics
        #[arg(long)]
        subtopics: bool,
    },

    /// Show history statistics
    Stats,

    /// Mark a topic as reviewed (memory strength back to 100%)
    Remember {
        /// Topic id or unique id prefix
        id: String,
    },

    /// Delete a topic
    Delete {
        /// Topic id or unique id prefix
        id: String,
    },

    /// Group a topic under another as a subtopic
    Group {
        /// Parent topic id or prefix
        parent: String,
        /// Topic to move under the parent
        child: String,
    },

    /// Delete the whole history
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export the history to a JSON file
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Import a previously exported JSON file
    Import {
        /// Path to export file
        file: PathBuf,
        /// merge (file wins on matching ids) or replace
        #[arg(long, default_value = "merge")]
        mode: ImportMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let mut config = KdpConfig::from_env()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }

    let db_path = config.db_path()?;
    tracing::debug!(path = %db_path.display(), "Opening history");
    let store = Arc::new(HistoryStore::new(Arc::new(SqliteStore::new(Some(db_path))?)));

    match cli.command {
        Commands::Capture {
            title,
            url,
            content,
            content_file,
            time_spent,
            enforce_policy,
        } => {
            let content = match content_file {
                Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to read {}: {}", path.display(), e)
                })?,
                None => content.unwrap_or_default(),
            };
            run_capture(&config, store, CaptureEvent::new(title, url, content, time_spent), enforce_policy).await
        }
        Commands::List {
            filter,
            limit,
            subtopics,
        } => run_list(&store, filter, limit, subtopics).await,
        Commands::Stats => run_stats(&store).await,
        Commands::Remember { id } => run_remember(&store, &id).await,
        Commands::Delete { id } => run_delete(&store, &id).await,
        Commands::Group { parent, child } => run_group(&store, &parent, &child).await,
        Commands::Clear { yes } => run_clear(&store, yes).await,
        Commands::Export { output } => run_export(&store, output).await,
        Commands::Import { file, mode } => run_import(&store, file, mode).await,
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

async fn run_capture(
    config: &KdpConfig,
    store: Arc<HistoryStore>,
    event: CaptureEvent,
    enforce_policy: bool,
) -> anyhow::Result<()> {
    if event.title.trim().is_empty() {
        anyhow::bail!("Title cannot be empty");
    }

    let event = if enforce_policy {
        match CapturePolicy::default().qualify(event) {
            Some(event) => event,
            None => {
                println!("{}", "Session does not qualify for capture; nothing recorded.".yellow());
                return Ok(());
            }
        }
    } else {
        event
    };

    let mut pipeline = CapturePipeline::new(store).with_timeout(config.summarizer_timeout);
    if let Some(summarizer) = config.summarizer() {
        pipeline = pipeline.with_summarizer(summarizer);
    }

    let outcome = pipeline.capture(event).await?;
    let entry = &outcome.entry;

    println!("{}", "=== KDP Capture ===".cyan().bold());
    println!();
    println!("{}: {}", "Decision".white().bold(), outcome.decision.to_string().green());
    println!("{}: {}", "Analysis".white().bold(), outcome.source);
    if outcome.decision == InsertOutcome::Inserted {
        println!("{}: {}", "Topic ID".white().bold(), entry.id);
    }
    println!("{}: {}", "Domain".white().bold(), entry.domain);
    println!("{}: {}", "Complexity".white().bold(), stars(entry.complexity));
    println!("{}: {}", "Concepts".white().bold(), entry.concepts.join(", "));
    println!("{}: {}", "Summary".white().bold(), entry.summary);

    if outcome.decision == InsertOutcome::Skipped {
        println!();
        println!(
            "{}",
            "Same page was captured less than 5 minutes ago; skipped.".dimmed()
        );
    }

    Ok(())
}

async fn run_list(
    store: &HistoryStore,
    filter: BucketFilter,
    limit: Option<usize>,
    show_subtopics: bool,
) -> anyhow::Result<()> {
    let now = Utc::now().timestamp_millis();
    let scored = filter_entries(score_entries(store.all().await?, now), filter);

    if scored.is_empty() {
        println!("{}", "No topics found.".dimmed());
        if filter == BucketFilter::All {
            println!("Capture a study session with {}", "kdp capture".cyan());
        }
        return Ok(());
    }

    let shown = limit.unwrap_or(scored.len());
    for item in scored.iter().take(shown) {
        print_entry(item, now);

        if show_subtopics {
            for sub in score_subtopics(&item.item, now) {
                println!(
                    "    {} {} {}  {}",
                    "-".dimmed(),
                    bucket_color(sub.bucket, &format!("{:>3.0}%", sub.score)),
                    truncate(&sub.item.title, 56),
                    time_ago(sub.item.learned_at, now).dimmed()
                );
            }
        }
        println!();
    }

    if shown < scored.len() {
        println!("{}", format!("... and {} more", scored.len() - shown).dimmed());
    }

    Ok(())
}

fn print_entry(scored: &ScoredEntry, now: i64) {
    let entry = &scored.item;

    println!(
        "{} {}  {}",
        bucket_color(scored.bucket, &format!("{:>3.0}%", scored.score)).bold(),
        truncate(&entry.title, 60).white().bold(),
        stars(entry.complexity)
    );
    println!("     {}", entry.concepts.join(" | ").cyan());
    if !entry.summary.is_empty() {
        println!("     {}", truncate(&entry.summary, 120));
    }

    let mut footer = format!(
        "{}  {}  {}",
        time_ago(entry.learned_at, now),
        entry.domain,
        short_id(&entry.id)
    );
    if scored.bucket != MemoryBucket::Forgotten {
        if let Some(hours) = hours_remaining(entry.complexity, entry.learned_at, now, REVIEW_THRESHOLD) {
            footer.push_str(&format!("  review in {:.0}h", hours.ceil()));
        }
    }
    if entry.subtopic_count() > 0 {
        footer.push_str(&format!("  +{} subtopics", entry.subtopic_count()));
    }
    println!("     {}", footer.dimmed());
    println!("     {}", entry.url.dimmed().underline());
}

async fn run_stats(store: &HistoryStore) -> anyhow::Result<()> {
    let now = Utc::now().timestamp_millis();
    let stats = HistoryStats::from_scored(&score_entries(store.all().await?, now));

    println!("{}", "=== KDP Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Topics Learned".white().bold(), stats.total);
    println!("{}: {}", "Need Review".white().bold(), stats.forgotten);
    println!("{}: {:.0}%", "Average Memory".white().bold(), stats.average_score);

    if stats.total > 0 {
        println!();
        print_distribution_bar("Strong (>=80%)", stats.strong, stats.total, MemoryBucket::Strong);
        print_distribution_bar("Review (50-80%)", stats.review, stats.total, MemoryBucket::Review);
        print_distribution_bar("Forgotten (<50%)", stats.forgotten, stats.total, MemoryBucket::Forgotten);
    }

    Ok(())
}

async fn run_remember(store: &HistoryStore, id: &str) -> anyhow::Result<()> {
    let id = resolve_id(store, id).await?;
    match store.restore_memory(&id).await? {
        Some(entry) => println!(
            "{}",
            format!("Memory refreshed: {} (100%)", truncate(&entry.title, 60)).green().bold()
        ),
        None => anyhow::bail!("Topic not found: {}", id),
    }
    Ok(())
}

async fn run_delete(store: &HistoryStore, id: &str) -> anyhow::Result<()> {
    let id = resolve_id(store, id).await?;
    if !store.delete(&id).await? {
        anyhow::bail!("Topic not found: {}", id);
    }
    println!("{}", format!("Deleted {}", short_id(&id)).green());
    Ok(())
}

async fn run_group(store: &HistoryStore, parent: &str, child: &str) -> anyhow::Result<()> {
    let parent = resolve_id(store, parent).await?;
    let child = resolve_id(store, child).await?;
    if parent == child {
        anyhow::bail!("A topic cannot be grouped under itself");
    }

    match store.attach_subtopic(&parent, &child).await? {
        Some(entry) => println!(
            "{}",
            format!(
                "Grouped under {} ({} subtopics)",
                truncate(&entry.title, 60),
                entry.subtopic_count()
            )
            .green()
        ),
        None => anyhow::bail!("Topic not found"),
    }
    Ok(())
}

async fn run_clear(store: &HistoryStore, yes: bool) -> anyhow::Result<()> {
    let count = store.len().await?;
    if count == 0 {
        println!("{}", "History is already empty.".dimmed());
        return Ok(());
    }

    // Confirmation prompt (unless --yes)
    if !yes {
        print!(
            "{} Delete all {} topics? This cannot be undone. [y/N] ",
            "WARNING:".red().bold(),
            count
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "y" && input != "yes" {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let removed = store.clear_all().await?;
    println!("{}", format!("Cleared {} topics", removed).green().bold());
    Ok(())
}

async fn run_export(store: &HistoryStore, output: PathBuf) -> anyhow::Result<()> {
    let snapshot = store.export().await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&output)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;

    println!(
        "{}",
        format!("Exported {} topics to {}", snapshot.total_topics, output.display())
            .green()
            .bold()
    );
    Ok(())
}

async fn run_import(store: &HistoryStore, file: PathBuf, mode: ImportMode) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;

    let summary = store.import(&json, mode).await?;
    println!(
        "{}",
        format!(
            "Imported {} topics ({}): {} -> {} in history",
            summary.incoming, summary.mode, summary.previous, summary.total
        )
        .green()
        .bold()
    );
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

/// Expand a unique id prefix to the full id
async fn resolve_id(store: &HistoryStore, prefix: &str) -> anyhow::Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        anyhow::bail!("Topic id cannot be empty");
    }

    let matches: Vec<String> = store
        .all()
        .await?
        .into_iter()
        .map(|e| e.id)
        .filter(|id| id.starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => anyhow::bail!("Topic not found: {}", prefix),
        _ => anyhow::bail!("Id prefix '{}' matches {} topics", prefix, matches.len()),
    }
}

fn bucket_color(bucket: MemoryBucket, text: &str) -> ColoredString {
    match bucket {
        MemoryBucket::Strong => text.green(),
        MemoryBucket::Review => text.yellow(),
        MemoryBucket::Forgotten => text.red(),
    }
}

fn print_distribution_bar(label: &str, count: usize, total: usize, bucket: MemoryBucket) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    let bar_width = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(bar_width - filled));

    println!(
        "  {:<18} {} {:>3} ({:>5.1}%)",
        label,
        bucket_color(bucket, &bar),
        count,
        percentage
    );
}

fn stars(complexity: u8) -> String {
    "*".repeat(complexity as usize)
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Relative age of a timestamp ("Just now", "5m ago", "3h ago", "2d ago")
fn time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms).max(0) / 1000;

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Truncate a string for display (UTF-8 safe)
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
