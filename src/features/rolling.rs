use crate::models::{EncodedMatch, RolledMatch, STAT_COLS};
use std::collections::BTreeMap;

/// Trailing-window size used by the original analysis
pub const DEFAULT_WINDOW: usize = 4;

/// Compute per-team trailing means of the stat columns.
///
/// For each team the matches are ordered by date and every match receives the
/// mean of the previous `window` matches' statistics. The current match never
/// contributes to its own window, and matches without `window` prior matches
/// are dropped. Output is grouped by team name, each group in date order.
pub fn apply_rolling_averages(encoded: Vec<EncodedMatch>, window: usize) -> Vec<RolledMatch> {
    let mut by_team: BTreeMap<String, Vec<EncodedMatch>> = BTreeMap::new();
    for m in encoded {
        by_team.entry(m.team.clone()).or_default().push(m);
    }

    let mut rolled = Vec::new();
    for (_, mut group) in by_team {
        group.sort_by_key(|m| m.date);

        for idx in window..group.len() {
            let mut rolling = [0.0; STAT_COLS.len()];
            for prior in &group[idx - window..idx] {
                for (sum, stat) in rolling.iter_mut().zip(prior.stats.iter()) {
                    *sum += stat;
                }
            }
            for sum in rolling.iter_mut() {
                *sum /= window as f64;
            }
            rolled.push(RolledMatch {
                base: group[idx].clone(),
                rolling,
            });
        }
    }

    rolled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(team: &str, date: &str, gf: f64) -> EncodedMatch {
        EncodedMatch {
            date: date.parse().unwrap(),
            team: team.to_string(),
            opponent: "Opponent".to_string(),
            result: "W".to_string(),
            target: 1,
            venue_code: 0,
            opp_code: 0,
            hour: 15,
            day_code: 5,
            stats: [gf, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_window_excludes_current_match() {
        let matches = vec![
            m("Arsenal", "2022-08-06", 1.0),
            m("Arsenal", "2022-08-13", 2.0),
            m("Arsenal", "2022-08-20", 3.0),
            m("Arsenal", "2022-08-27", 4.0),
            m("Arsenal", "2022-09-03", 10.0),
        ];
        let rolled = apply_rolling_averages(matches, 4);
        assert_eq!(rolled.len(), 1);
        // mean of the first four, not including the fifth match itself
        assert_eq!(rolled[0].rolling[0], 2.5);
        assert_eq!(rolled[0].base.stats[0], 10.0);
    }

    #[test]
    fn test_short_history_is_dropped() {
        let matches = vec![
            m("Arsenal", "2022-08-06", 1.0),
            m("Arsenal", "2022-08-13", 2.0),
            m("Arsenal", "2022-08-20", 3.0),
        ];
        assert!(apply_rolling_averages(matches, 4).is_empty());
    }

    #[test]
    fn test_three_match_window_variant() {
        let matches = vec![
            m("Arsenal", "2022-08-06", 3.0),
            m("Arsenal", "2022-08-13", 6.0),
            m("Arsenal", "2022-08-20", 9.0),
            m("Arsenal", "2022-08-27", 0.0),
        ];
        let rolled = apply_rolling_averages(matches, 3);
        assert_eq!(rolled.len(), 1);
        assert_eq!(rolled[0].rolling[0], 6.0);
    }

    #[test]
    fn test_teams_roll_independently_and_sort_by_name() {
        let mut matches = Vec::new();
        for (i, date) in ["2022-08-06", "2022-08-13", "2022-08-20", "2022-08-27", "2022-09-03"]
            .iter()
            .enumerate()
        {
            matches.push(m("Chelsea", date, i as f64));
            matches.push(m("Arsenal", date, 10.0 + i as f64));
        }
        let rolled = apply_rolling_averages(matches, 4);
        assert_eq!(rolled.len(), 2);
        assert_eq!(rolled[0].base.team, "Arsenal");
        assert_eq!(rolled[0].rolling[0], 11.5);
        assert_eq!(rolled[1].base.team, "Chelsea");
        assert_eq!(rolled[1].rolling[0], 1.5);
    }

    #[test]
    fn test_matches_are_date_sorted_within_a_team() {
        let matches = vec![
            m("Arsenal", "2022-09-03", 10.0),
            m("Arsenal", "2022-08-27", 4.0),
            m("Arsenal", "2022-08-06", 1.0),
            m("Arsenal", "2022-08-20", 3.0),
            m("Arsenal", "2022-08-13", 2.0),
        ];
        let rolled = apply_rolling_averages(matches, 4);
        assert_eq!(rolled.len(), 1);
        assert_eq!(rolled[0].base.date, "2022-09-03".parse().unwrap());
        assert_eq!(rolled[0].rolling[0], 2.5);
    }
}
