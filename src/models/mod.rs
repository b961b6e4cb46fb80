use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shooting/offense statistics carried per match, in CSV column order.
pub const STAT_COLS: [&str; 8] = ["gf", "ga", "sh", "sot", "dist", "fk", "pk", "pkatt"];

/// One row of the flat match table: a single match from one team's perspective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRow {
    pub season: u16,
    pub team: String,
    pub date: NaiveDate,
    pub time: String,
    pub round: String,
    pub day: String,
    pub venue: String,
    pub result: String,
    pub gf: f64,
    pub ga: f64,
    pub opponent: String,
    pub sh: f64,
    pub sot: f64,
    pub dist: Option<f64>, // empty when the team recorded no shots
    pub fk: f64,
    pub pk: f64,
    pub pkatt: f64,
}

/// Match row with engineered features attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedMatch {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub result: String,
    pub target: usize, // 1 iff the match was won
    pub venue_code: u32,
    pub opp_code: u32,
    pub hour: u32,
    pub day_code: u32,
    pub stats: [f64; STAT_COLS.len()],
}

/// Encoded match plus trailing-mean statistics over the previous matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolledMatch {
    pub base: EncodedMatch,
    pub rolling: [f64; STAT_COLS.len()],
}

/// One test-set prediction joined back to the match context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub result: String,
    pub actual: usize,
    pub predicted: usize,
}

impl PredictionRow {
    /// Format the prediction as a readable line
    pub fn format(&self) -> String {
        format!(
            "{} | {} vs {} | result: {} | predicted: {}",
            self.date,
            self.team,
            self.opponent,
            self.result,
            if self.predicted == 1 { "W" } else { "L/D" }
        )
    }
}

/// Evaluation output for one trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub model: String,
    pub precision_pct: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub predictions: Vec<PredictionRow>,
}

/// Outcome of the paired-fixture analysis (one side predicted to win,
/// the opposing row predicted not to)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedReport {
    pub pairs: usize,
    pub wins: usize,
    pub precision_pct: f64,
}

/// Win count for one team over the test split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamWins {
    pub team: String,
    pub wins: usize,
}

/// Dataset-shape errors surfaced by the pipeline
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("match table is empty")]
    EmptyTable,
    #[error("no training rows before cutoff {0}")]
    NoTrainingRows(NaiveDate),
    #[error("no test rows after cutoff {0}")]
    NoTestRows(NaiveDate),
}
