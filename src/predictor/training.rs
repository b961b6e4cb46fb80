use crate::models::{DatasetError, ModelReport, PredictionRow, RolledMatch, STAT_COLS};
use crate::predictor::forest::{ForestParams, RandomForest};
use crate::predictor::metrics::weighted_precision;
use anyhow::Result;
use chrono::NaiveDate;
use ndarray::{Array1, Array2};

/// Training cutoff used by the original analysis: matches strictly before it
/// train the model, matches strictly after it evaluate it.
pub fn default_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

/// Which columns a model trains on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSet {
    /// venue_code, opp_code, hour, day_code
    Baseline,
    /// Baseline plus the trailing-mean stat columns
    Rolling,
}

impl FeatureSet {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureSet::Baseline => "initial model",
            FeatureSet::Rolling => "rolling model",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            FeatureSet::Baseline => 4,
            FeatureSet::Rolling => 4 + STAT_COLS.len(),
        }
    }
}

fn feature_row(m: &RolledMatch, set: FeatureSet) -> Vec<f64> {
    let mut row = vec![
        f64::from(m.base.venue_code),
        f64::from(m.base.opp_code),
        f64::from(m.base.hour),
        f64::from(m.base.day_code),
    ];
    if set == FeatureSet::Rolling {
        row.extend_from_slice(&m.rolling);
    }
    row
}

/// Build the feature matrix for one model
pub fn feature_matrix(rows: &[&RolledMatch], set: FeatureSet) -> Array2<f64> {
    let mut flat = Vec::with_capacity(rows.len() * set.width());
    for row in rows {
        flat.extend(feature_row(row, set));
    }
    Array2::from_shape_vec((rows.len(), set.width()), flat).expect("fixed row width")
}

fn targets(rows: &[&RolledMatch]) -> Array1<usize> {
    Array1::from_iter(rows.iter().map(|r| r.base.target))
}

/// Train a forest on matches before the cutoff and evaluate it on matches
/// after the cutoff. Matches played exactly on the cutoff date belong to
/// neither split.
pub fn train_and_evaluate(
    rows: &[RolledMatch],
    set: FeatureSet,
    params: &ForestParams,
    cutoff: NaiveDate,
) -> Result<ModelReport> {
    let train: Vec<&RolledMatch> = rows.iter().filter(|r| r.base.date < cutoff).collect();
    let test: Vec<&RolledMatch> = rows.iter().filter(|r| r.base.date > cutoff).collect();

    if train.is_empty() {
        return Err(DatasetError::NoTrainingRows(cutoff).into());
    }
    if test.is_empty() {
        return Err(DatasetError::NoTestRows(cutoff).into());
    }

    let forest = RandomForest::fit(&feature_matrix(&train, set), &targets(&train), params)?;
    let predicted = forest.predict(&feature_matrix(&test, set));
    let actual = targets(&test);

    let predictions: Vec<PredictionRow> = test
        .iter()
        .zip(predicted.iter())
        .map(|(m, &pred)| PredictionRow {
            date: m.base.date,
            team: m.base.team.clone(),
            opponent: m.base.opponent.clone(),
            result: m.base.result.clone(),
            actual: m.base.target,
            predicted: pred,
        })
        .collect();

    let precision_pct =
        weighted_precision(actual.as_slice().unwrap(), predicted.as_slice().unwrap()) * 100.0;

    Ok(ModelReport {
        model: set.name().to_string(),
        precision_pct,
        train_rows: train.len(),
        test_rows: test.len(),
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EncodedMatch;

    fn rolled(date: &str, team: &str, venue_code: u32) -> RolledMatch {
        // Outcome tracks the venue exactly, so the forest has a learnable rule
        let target = usize::from(venue_code == 1);
        RolledMatch {
            base: EncodedMatch {
                date: date.parse().unwrap(),
                team: team.to_string(),
                opponent: "Opponent".to_string(),
                result: if target == 1 { "W" } else { "L" }.to_string(),
                target,
                venue_code,
                opp_code: 3,
                hour: 15,
                day_code: 5,
                stats: [1.0; STAT_COLS.len()],
            },
            rolling: [1.0; STAT_COLS.len()],
        }
    }

    fn venue_dataset() -> Vec<RolledMatch> {
        let mut rows = Vec::new();
        for week in 0..20 {
            let date = default_cutoff() - chrono::Duration::days(7 * (week + 1));
            rows.push(rolled(&date.to_string(), "Arsenal", (week % 2) as u32));
            rows.push(rolled(&date.to_string(), "Chelsea", ((week + 1) % 2) as u32));
        }
        for week in 0..4 {
            let date = default_cutoff() + chrono::Duration::days(7 * (week + 1));
            rows.push(rolled(&date.to_string(), "Arsenal", (week % 2) as u32));
            rows.push(rolled(&date.to_string(), "Chelsea", ((week + 1) % 2) as u32));
        }
        rows
    }

    #[test]
    fn test_split_sizes_and_learned_rule() {
        let rows = venue_dataset();
        let report = train_and_evaluate(
            &rows,
            FeatureSet::Baseline,
            &ForestParams::default(),
            default_cutoff(),
        )
        .unwrap();

        assert_eq!(report.train_rows, 40);
        assert_eq!(report.test_rows, 8);
        assert_eq!(report.predictions.len(), 8);
        assert!((report.precision_pct - 100.0).abs() < 1e-9);
        assert_eq!(report.model, "initial model");
    }

    #[test]
    fn test_cutoff_day_rows_are_excluded() {
        let mut rows = venue_dataset();
        rows.push(rolled(&default_cutoff().to_string(), "Everton", 1));
        let report = train_and_evaluate(
            &rows,
            FeatureSet::Rolling,
            &ForestParams::default(),
            default_cutoff(),
        )
        .unwrap();
        assert_eq!(report.train_rows, 40);
        assert_eq!(report.test_rows, 8);
    }

    #[test]
    fn test_empty_splits_are_errors() {
        let rows: Vec<RolledMatch> = venue_dataset()
            .into_iter()
            .filter(|r| r.base.date > default_cutoff())
            .collect();
        let err = train_and_evaluate(
            &rows,
            FeatureSet::Baseline,
            &ForestParams::default(),
            default_cutoff(),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<DatasetError>().is_some());
    }

    #[test]
    fn test_feature_matrix_widths() {
        let rows = venue_dataset();
        let refs: Vec<&RolledMatch> = rows.iter().collect();
        assert_eq!(feature_matrix(&refs, FeatureSet::Baseline).ncols(), 4);
        assert_eq!(feature_matrix(&refs, FeatureSet::Rolling).ncols(), 12);
    }
}
