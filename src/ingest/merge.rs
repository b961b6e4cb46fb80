use crate::models::MatchRow;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// One row of a team's "Scores & Fixtures" export
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Comp")]
    pub comp: String,
    #[serde(rename = "Round")]
    pub round: String,
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Venue")]
    pub venue: String,
    #[serde(rename = "Result")]
    pub result: Option<String>,
    #[serde(rename = "GF")]
    pub gf: Option<f64>,
    #[serde(rename = "GA")]
    pub ga: Option<f64>,
    #[serde(rename = "Opponent")]
    pub opponent: String,
}

/// One row of a team's "Shooting" export
#[derive(Debug, Clone, Deserialize)]
pub struct ShootingRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sh")]
    pub sh: f64,
    #[serde(rename = "SoT")]
    pub sot: f64,
    #[serde(rename = "Dist")]
    pub dist: Option<f64>,
    #[serde(rename = "FK")]
    pub fk: f64,
    #[serde(rename = "PK")]
    pub pk: f64,
    #[serde(rename = "PKatt")]
    pub pkatt: f64,
}

pub fn read_fixtures(path: &Path) -> Result<Vec<FixtureRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open fixtures table {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<FixtureRow>, _>>()
        .with_context(|| format!("Failed to parse fixtures table {}", path.display()))
}

pub fn read_shooting(path: &Path) -> Result<Vec<ShootingRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open shooting table {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<ShootingRow>, _>>()
        .with_context(|| format!("Failed to parse shooting table {}", path.display()))
}

/// Inner-join a team's fixture and shooting tables on date, keeping only
/// played Premier League matches
pub fn merge_team_tables(
    fixtures: &[FixtureRow],
    shooting: &[ShootingRow],
    team: &str,
    season: u16,
) -> Vec<MatchRow> {
    let shooting_by_date: HashMap<NaiveDate, &ShootingRow> =
        shooting.iter().map(|s| (s.date, s)).collect();

    let mut rows = Vec::new();
    for fixture in fixtures {
        if fixture.comp != "Premier League" {
            continue;
        }
        let (result, gf, ga) = match (&fixture.result, fixture.gf, fixture.ga) {
            (Some(result), Some(gf), Some(ga)) => (result.clone(), gf, ga),
            _ => {
                warn!(team = %team, date = %fixture.date, "fixture without a result, skipping");
                continue;
            }
        };
        let shot = match shooting_by_date.get(&fixture.date) {
            Some(shot) => shot,
            None => continue, // inner join: no shooting row, no match row
        };

        rows.push(MatchRow {
            season,
            team: team.to_string(),
            date: fixture.date,
            time: fixture.time.clone(),
            round: fixture.round.clone(),
            day: fixture.day.clone(),
            venue: fixture.venue.clone(),
            result,
            gf,
            ga,
            opponent: fixture.opponent.clone(),
            sh: shot.sh,
            sot: shot.sot,
            dist: shot.dist,
            fk: shot.fk,
            pk: shot.pk,
            pkatt: shot.pkatt,
        });
    }

    rows
}

/// Build the flat match table from a directory tree laid out as
/// `raw_dir/<season>/<team>/{fixtures.csv,shooting.csv}`.
/// Team directory names use '-' for spaces ("Manchester-City").
pub fn build_match_table(raw_dir: &Path) -> Result<Vec<MatchRow>> {
    let mut season_dirs: Vec<_> = std::fs::read_dir(raw_dir)
        .with_context(|| format!("Failed to read raw data dir {}", raw_dir.display()))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    season_dirs.sort();

    let mut all_rows = Vec::new();
    for season_dir in season_dirs {
        let season: u16 = match season_dir
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.parse().ok())
        {
            Some(season) => season,
            None => {
                warn!(dir = %season_dir.display(), "non-season directory in raw data dir, skipping");
                continue;
            }
        };

        let mut team_dirs: Vec<_> = std::fs::read_dir(&season_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        team_dirs.sort();

        for team_dir in team_dirs {
            let team = match team_dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.replace('-', " "),
                None => continue,
            };
            let fixtures = read_fixtures(&team_dir.join("fixtures.csv"))?;
            let shooting = read_shooting(&team_dir.join("shooting.csv"))?;
            all_rows.extend(merge_team_tables(&fixtures, &shooting, &team, season));
        }
    }

    Ok(all_rows)
}

/// Write the flat match table with lowercase headers
pub fn write_match_table(rows: &[MatchRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create match table {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
