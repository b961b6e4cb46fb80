use crate::models::{MatchRow, RolledMatch, STAT_COLS};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load the flat match table CSV
pub fn load_match_table(path: &Path) -> Result<Vec<MatchRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open match table {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<MatchRow>, _>>()
        .with_context(|| format!("Failed to parse match table {}", path.display()))
}

/// Save a value to a JSON cache file
pub fn save_to_cache<T: Serialize>(value: &T, cache_file: &str) -> Result<()> {
    if let Some(parent) = Path::new(cache_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize cache data")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load a value from a JSON cache file
pub fn load_from_cache<T: DeserializeOwned>(cache_file: &str) -> Result<T> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    serde_json::from_str(&json).context("Failed to deserialize cache data")
}

/// Save the rolled match table to CSV (the original's `modified_matches.csv`)
pub fn save_rolled_to_csv(rows: &[RolledMatch], filename: &str) -> Result<()> {
    if let Some(parent) = Path::new(filename).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(filename).context("Failed to create CSV file")?;

    // Write CSV header
    let rolling_cols: Vec<String> = STAT_COLS.iter().map(|c| format!("{}_rolling", c)).collect();
    writeln!(
        file,
        "date,team,opponent,result,target,venue_code,opp_code,hour,day_code,{},{}",
        STAT_COLS.join(","),
        rolling_cols.join(",")
    )?;

    // Write each match
    for row in rows {
        let stats: Vec<String> = row.base.stats.iter().map(|v| v.to_string()).collect();
        let rolling: Vec<String> = row.rolling.iter().map(|v| v.to_string()).collect();
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            row.base.date,
            row.base.team,
            row.base.opponent,
            row.base.result,
            row.base.target,
            row.base.venue_code,
            row.base.opp_code,
            row.base.hour,
            row.base.day_code,
            stats.join(","),
            rolling.join(",")
        )?;
    }

    Ok(())
}
