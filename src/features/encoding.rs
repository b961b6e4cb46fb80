use crate::models::{DatasetError, EncodedMatch, MatchRow};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use tracing::warn;

/// Assigns integer codes to string categories by lexicographic order,
/// so codes depend only on the set of distinct values, not row order.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    categories: Vec<String>,
}

impl CategoryEncoder {
    /// Build an encoder over the distinct values seen in the input
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        Self {
            categories: distinct.into_iter().map(String::from).collect(),
        }
    }

    /// Code for a value, or None if it was not seen during fit
    pub fn code(&self, value: &str) -> Option<u32> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
            .map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Hour of kickoff from a "HH:MM" time string (everything before the first ':')
pub fn kickoff_hour(time: &str) -> Option<u32> {
    let head = time.split(':').next()?.trim();
    head.parse().ok()
}

/// Weekday code with Monday = 0
pub fn weekday_code(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Attach engineered features to every match row.
///
/// Rows with an unparseable kickoff time or a missing shot-distance value are
/// skipped with a warning; category encoders are still fit over all rows.
pub fn encode_matches(rows: &[MatchRow]) -> Result<Vec<EncodedMatch>, DatasetError> {
    if rows.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    let venues = CategoryEncoder::fit(rows.iter().map(|r| r.venue.as_str()));
    let opponents = CategoryEncoder::fit(rows.iter().map(|r| r.opponent.as_str()));

    let mut encoded = Vec::with_capacity(rows.len());
    for row in rows {
        let hour = match kickoff_hour(&row.time) {
            Some(h) => h,
            None => {
                warn!(team = %row.team, date = %row.date, time = %row.time, "unparseable kickoff time, skipping row");
                continue;
            }
        };
        let dist = match row.dist {
            Some(d) => d,
            None => {
                warn!(team = %row.team, date = %row.date, "missing shot distance, skipping row");
                continue;
            }
        };

        // Encoders were fit on these same rows, so the lookups cannot miss
        let venue_code = venues.code(&row.venue).unwrap_or_default();
        let opp_code = opponents.code(&row.opponent).unwrap_or_default();

        let stats = [
            row.gf, row.ga, row.sh, row.sot, dist, row.fk, row.pk, row.pkatt,
        ];

        encoded.push(EncodedMatch {
            date: row.date,
            team: row.team.clone(),
            opponent: row.opponent.clone(),
            result: row.result.clone(),
            target: usize::from(row.result == "W"),
            venue_code,
            opp_code,
            hour,
            day_code: weekday_code(row.date),
            stats,
        });
    }

    Ok(encoded)
}
