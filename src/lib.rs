pub mod features;
pub mod ingest;
pub mod models;
pub mod predictor;
pub mod utils;

pub use features::*;
pub use ingest::*;
pub use models::*;
pub use predictor::*;
pub use utils::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use features::{apply_rolling_averages, encode_matches, DEFAULT_WINDOW};
use models::{ModelReport, PairedReport, RolledMatch, TeamWins};
use predictor::{
    count_actual_wins, count_predicted_wins, default_cutoff, paired_outcomes, train_and_evaluate,
    FeatureSet, ForestParams,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utils::data::{load_from_cache, load_match_table, save_to_cache};

const ANALYSIS_CACHE_FILE: &str = "cache/analysis_cache.json";

/// All the data the CLI and the web dashboard display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisData {
    pub initial_report: ModelReport,
    pub rolling_report: ModelReport,
    pub paired: PairedReport,
    pub predicted_wins: Vec<TeamWins>,
    pub actual_wins: Vec<TeamWins>,
}

/// Pipeline configuration, read from the environment and overridable per run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub matches_csv: PathBuf,
    pub window: usize,
    pub cutoff: NaiveDate,
    pub forest: ForestParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            matches_csv: PathBuf::from("data/matches.csv"),
            window: DEFAULT_WINDOW,
            cutoff: default_cutoff(),
            forest: ForestParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read configuration from the environment (`MATCHES_CSV`,
    /// `ROLLING_WINDOW`, `TRAIN_CUTOFF`), falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("MATCHES_CSV") {
            config.matches_csv = PathBuf::from(path);
        }
        if let Some(window) = std::env::var("ROLLING_WINDOW")
            .ok()
            .and_then(|w| w.parse().ok())
        {
            config.window = window;
        }
        if let Some(cutoff) = std::env::var("TRAIN_CUTOFF")
            .ok()
            .and_then(|c| c.parse().ok())
        {
            config.cutoff = cutoff;
        }
        config
    }
}

/// Load the match table, engineer features, and apply the rolling window
pub fn prepare_rolled_matches(config: &AnalysisConfig) -> Result<Vec<RolledMatch>> {
    let rows = load_match_table(&config.matches_csv)?;
    let encoded = encode_matches(&rows).context("Failed to engineer features")?;
    Ok(apply_rolling_averages(encoded, config.window))
}

/// Run the full two-model analysis
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisData> {
    let rolled = prepare_rolled_matches(config)?;

    let initial_report =
        train_and_evaluate(&rolled, FeatureSet::Baseline, &config.forest, config.cutoff)
            .context("Failed to train the initial model")?;
    let rolling_report =
        train_and_evaluate(&rolled, FeatureSet::Rolling, &config.forest, config.cutoff)
            .context("Failed to train the rolling model")?;

    let paired = paired_outcomes(&rolling_report.predictions);
    let predicted_wins = count_predicted_wins(&rolling_report.predictions);
    let actual_wins = count_actual_wins(&rolling_report.predictions);

    Ok(AnalysisData {
        initial_report,
        rolling_report,
        paired,
        predicted_wins,
        actual_wins,
    })
}

/// Run the analysis, or reuse a previous run's JSON cache
pub fn run_full_analysis(config: &AnalysisConfig, use_cache: bool) -> Result<AnalysisData> {
    if use_cache && Path::new(ANALYSIS_CACHE_FILE).exists() {
        return load_from_cache(ANALYSIS_CACHE_FILE);
    }

    let data = run_analysis(config)?;
    save_to_cache(&data, ANALYSIS_CACHE_FILE)?;
    Ok(data)
}
