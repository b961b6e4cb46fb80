use crate::models::{PairedReport, PredictionRow, TeamWins};
use std::collections::{BTreeSet, HashMap};

/// Precision averaged over classes, weighted by each class's support in the
/// actual labels. A class that is never predicted contributes zero precision.
pub fn weighted_precision(actual: &[usize], predicted: &[usize]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }

    let classes: BTreeSet<usize> = actual.iter().chain(predicted.iter()).copied().collect();

    let mut weighted_sum = 0.0;
    for class in classes {
        let support = actual.iter().filter(|&&a| a == class).count();
        if support == 0 {
            continue;
        }
        let predicted_count = predicted.iter().filter(|&&p| p == class).count();
        let true_positives = actual
            .iter()
            .zip(predicted.iter())
            .filter(|&(&a, &p)| a == class && p == class)
            .count();
        let precision = if predicted_count == 0 {
            0.0
        } else {
            true_positives as f64 / predicted_count as f64
        };
        weighted_sum += support as f64 * precision;
    }

    weighted_sum / actual.len() as f64
}

/// Per-team counts of matches the model predicted as wins,
/// sorted by count descending then team name
pub fn count_predicted_wins(rows: &[PredictionRow]) -> Vec<TeamWins> {
    count_wins_by(rows, |r| r.predicted == 1)
}

/// Per-team counts of matches actually won over the same rows
pub fn count_actual_wins(rows: &[PredictionRow]) -> Vec<TeamWins> {
    count_wins_by(rows, |r| r.actual == 1)
}

fn count_wins_by<F>(rows: &[PredictionRow], is_win: F) -> Vec<TeamWins>
where
    F: Fn(&PredictionRow) -> bool,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter().filter(|&r| is_win(r)) {
        *counts.entry(row.team.as_str()).or_default() += 1;
    }

    let mut wins: Vec<TeamWins> = counts
        .into_iter()
        .map(|(team, wins)| TeamWins {
            team: team.to_string(),
            wins,
        })
        .collect();
    wins.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.team.cmp(&b.team)));
    wins
}

/// Pair each prediction row with the opposing team's row for the same date
/// (left team equals right opponent) and keep pairs where one side is
/// predicted to win and the other predicted not to. Precision is the share of
/// those pairs where the predicted winner actually won.
pub fn paired_outcomes(rows: &[PredictionRow]) -> PairedReport {
    let mut by_date_opponent: HashMap<(chrono::NaiveDate, &str), Vec<&PredictionRow>> =
        HashMap::new();
    for row in rows {
        by_date_opponent
            .entry((row.date, row.opponent.as_str()))
            .or_default()
            .push(row);
    }

    let mut pairs = 0;
    let mut wins = 0;
    for left in rows {
        let candidates = match by_date_opponent.get(&(left.date, left.team.as_str())) {
            Some(candidates) => candidates,
            None => continue,
        };
        for right in candidates {
            if left.predicted == 1 && right.predicted == 0 {
                pairs += 1;
                if left.actual == 1 {
                    wins += 1;
                }
            }
        }
    }

    let precision_pct = if pairs == 0 {
        0.0
    } else {
        wins as f64 / pairs as f64 * 100.0
    };

    PairedReport {
        pairs,
        wins,
        precision_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(date: &str, team: &str, opponent: &str, actual: usize, predicted: usize) -> PredictionRow {
        PredictionRow {
            date: date.parse().unwrap(),
            team: team.to_string(),
            opponent: opponent.to_string(),
            result: if actual == 1 { "W" } else { "L" }.to_string(),
            actual,
            predicted,
        }
    }

    #[test]
    fn test_weighted_precision() {
        // class 1: 2/3 precision, support 3; class 0: 1/2 precision, support 2
        let actual = [1, 1, 0, 0, 1];
        let predicted = [1, 0, 0, 1, 1];
        let p = weighted_precision(&actual, &predicted);
        assert!((p - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_never_predicted_class_counts_as_zero() {
        let actual = [1, 0];
        let predicted = [1, 1];
        let p = weighted_precision(&actual, &predicted);
        assert!((p - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_predictions() {
        let labels = [1, 0, 1, 0];
        assert!((weighted_precision(&labels, &labels) - 1.0).abs() < 1e-9);
        assert_eq!(weighted_precision(&[], &[]), 0.0);
    }

    #[test]
    fn test_win_counts_sorted_by_count_then_name() {
        let rows = vec![
            pred("2023-02-04", "Arsenal", "Everton", 1, 1),
            pred("2023-02-11", "Arsenal", "Brentford", 0, 1),
            pred("2023-02-04", "Chelsea", "Fulham", 0, 1),
            pred("2023-02-11", "Chelsea", "West Ham", 1, 1),
            pred("2023-02-04", "Brighton", "Bournemouth", 1, 1),
            pred("2023-02-11", "Everton", "Liverpool", 0, 0),
        ];
        let wins = count_predicted_wins(&rows);
        assert_eq!(wins.len(), 3);
        assert_eq!((wins[0].team.as_str(), wins[0].wins), ("Arsenal", 2));
        assert_eq!((wins[1].team.as_str(), wins[1].wins), ("Chelsea", 2));
        assert_eq!((wins[2].team.as_str(), wins[2].wins), ("Brighton", 1));

        let actual = count_actual_wins(&rows);
        assert_eq!(actual.len(), 3);
        assert!(actual.iter().all(|t| t.wins == 1));
    }

    #[test]
    fn test_paired_outcomes() {
        let rows = vec![
            // qualifying pair, predicted winner actually won
            pred("2023-02-04", "Arsenal", "Everton", 1, 1),
            pred("2023-02-04", "Everton", "Arsenal", 0, 0),
            // qualifying pair, predicted winner lost
            pred("2023-02-11", "Chelsea", "Fulham", 0, 1),
            pred("2023-02-11", "Fulham", "Chelsea", 1, 0),
            // both sides predicted to win: not a qualifying pair
            pred("2023-02-18", "Brighton", "Palace", 1, 1),
            pred("2023-02-18", "Palace", "Brighton", 0, 1),
        ];
        let report = paired_outcomes(&rows);
        assert_eq!(report.pairs, 2);
        assert_eq!(report.wins, 1);
        assert!((report.precision_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_paired_outcomes_without_pairs() {
        let rows = vec![pred("2023-02-04", "Arsenal", "Everton", 1, 1)];
        let report = paired_outcomes(&rows);
        assert_eq!(report.pairs, 0);
        assert_eq!(report.precision_pct, 0.0);
    }
}
