use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pl_match_predictor::ingest::fetch::PageFetcher;
use pl_match_predictor::ingest::merge::{build_match_table, write_match_table};
use pl_match_predictor::utils::data::save_rolled_to_csv;
use pl_match_predictor::{
    prepare_rolled_matches, run_full_analysis, AnalysisConfig, AnalysisData,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pl_match_predictor", about = "Premier League match outcome predictor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mirror source pages into a local cache directory
    Fetch {
        /// File with one URL per line
        urls_file: PathBuf,
        #[arg(long, default_value = "cache/pages")]
        cache_dir: PathBuf,
    },
    /// Merge per-team fixture and shooting tables into the flat match table
    Merge {
        #[arg(long, default_value = "data/raw")]
        raw_dir: PathBuf,
        #[arg(long, default_value = "data/matches.csv")]
        out: PathBuf,
    },
    /// Train both models and report precision and win counts
    Predict {
        /// Match table CSV (defaults to MATCHES_CSV or data/matches.csv)
        #[arg(long)]
        matches: Option<PathBuf>,
        /// Trailing rolling-average window
        #[arg(long)]
        window: Option<usize>,
        /// Train/test cutoff date (YYYY-MM-DD)
        #[arg(long)]
        cutoff: Option<NaiveDate>,
        /// Reuse the cached analysis if present
        #[arg(long)]
        use_cache: bool,
        /// Export the rolled match table to cache/modified_matches.csv
        #[arg(long)]
        save_csv: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Fetch {
            urls_file,
            cache_dir,
        } => {
            let contents = std::fs::read_to_string(&urls_file)
                .with_context(|| format!("Failed to read {}", urls_file.display()))?;
            let urls: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect();

            println!("Mirroring {} pages into {}\n", urls.len(), cache_dir.display());
            let fetcher = PageFetcher::new();
            let written = fetcher.mirror_pages(&urls, &cache_dir).await?;
            println!("Fetched {} new pages ({} already cached)", written, urls.len() - written);
        }
        Command::Merge { raw_dir, out } => {
            println!("Merging team tables from {}\n", raw_dir.display());
            let rows = build_match_table(&raw_dir)?;
            write_match_table(&rows, &out)?;
            println!("Wrote {} match rows to {}", rows.len(), out.display());
        }
        Command::Predict {
            matches,
            window,
            cutoff,
            use_cache,
            save_csv,
        } => {
            let mut config = AnalysisConfig::from_env();
            if let Some(matches) = matches {
                config.matches_csv = matches;
            }
            if let Some(window) = window {
                config.window = window;
            }
            if let Some(cutoff) = cutoff {
                config.cutoff = cutoff;
            }

            println!(
                "Match table: {} (window: {}, cutoff: {})\n",
                config.matches_csv.display(),
                config.window,
                config.cutoff
            );

            if save_csv {
                let rolled = prepare_rolled_matches(&config)?;
                save_rolled_to_csv(&rolled, "cache/modified_matches.csv")?;
                println!("Saved rolled match table to cache/modified_matches.csv\n");
            }

            let data = run_full_analysis(&config, use_cache)?;
            print_analysis(&data);
        }
    }

    Ok(())
}

fn print_analysis(data: &AnalysisData) {
    println!("INITIAL MODEL\n");
    println!(
        "Precision score (initial model): {:.2}%\n",
        data.initial_report.precision_pct
    );

    println!("ROLLING MODEL\n");
    println!(
        "Precision score (rolling model): {:.2}%\n",
        data.rolling_report.precision_pct
    );

    println!("PAIRED FIXTURES\n");
    println!(
        "{} qualifying fixtures, predicted winner won {} ({:.2}%)\n",
        data.paired.pairs, data.paired.wins, data.paired.precision_pct
    );

    println!("PREDICTED WINS vs ACTUAL WINS\n");
    for predicted in &data.predicted_wins {
        let actual = data
            .actual_wins
            .iter()
            .find(|a| a.team == predicted.team)
            .map(|a| a.wins)
            .unwrap_or(0);
        println!("{}: {} predicted, {} actual", predicted.team, predicted.wins, actual);
    }
}
