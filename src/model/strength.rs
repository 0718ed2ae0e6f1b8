//! Composite team-strength summary.
//!
//! Scoring rates are normalized against a league baseline so a unit of
//! offense and a unit of defense are comparable: 0.5 on either component is
//! a league-average team, 1.0 is lapping the field. The composite blends
//! both with week-to-week consistency under fixed weights, and identical
//! stats always produce identical strengths; downstream prediction
//! reproducibility depends on that.

use serde::{Deserialize, Serialize};

use crate::data::models::TeamStats;
use crate::error::PredictionError;

/// League-average points per game. Normalization denominator is twice this,
/// so the baseline maps to 0.5 and only a ~45 ppg offense saturates at 1.0.
pub const LEAGUE_BASELINE_PPG: f64 = 22.5;

// Composite weights. Must sum to 1.
const OFFENSE_WEIGHT: f64 = 0.45;
const DEFENSE_WEIGHT: f64 = 0.35;
const CONSISTENCY_WEIGHT: f64 = 0.20;

/// Derived strength summary; recomputed whenever stats change, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub team_id: String,
    /// Weighted blend of the components below plus consistency, in [0,1]
    pub composite_score: f64,
    /// Normalized scoring offense, in [0,1]
    pub offense_component: f64,
    /// Normalized scoring defense (inverse of points allowed), in [0,1]
    pub defense_component: f64,
}

/// Reduce a weekly stat snapshot to a strength summary.
pub fn team_strength(stats: &TeamStats) -> Result<TeamStrength, PredictionError> {
    if !stats.points_scored_per_game.is_finite() || stats.points_scored_per_game < 0.0 {
        return Err(PredictionError::InvalidInput(format!(
            "{}: points scored per game is {}",
            stats.team_id, stats.points_scored_per_game
        )));
    }
    if !stats.points_allowed_per_game.is_finite() || stats.points_allowed_per_game < 0.0 {
        return Err(PredictionError::InvalidInput(format!(
            "{}: points allowed per game is {}",
            stats.team_id, stats.points_allowed_per_game
        )));
    }
    if !(0.0..=1.0).contains(&stats.consistency) {
        return Err(PredictionError::InvalidInput(format!(
            "{}: consistency {} outside [0, 1]",
            stats.team_id, stats.consistency
        )));
    }

    let offense_component =
        (stats.points_scored_per_game / (2.0 * LEAGUE_BASELINE_PPG)).clamp(0.0, 1.0);
    let defense_component =
        (1.0 - stats.points_allowed_per_game / (2.0 * LEAGUE_BASELINE_PPG)).clamp(0.0, 1.0);
    let composite_score = OFFENSE_WEIGHT * offense_component
        + DEFENSE_WEIGHT * defense_component
        + CONSISTENCY_WEIGHT * stats.consistency;

    Ok(TeamStrength {
        team_id: stats.team_id.clone(),
        composite_score,
        offense_component,
        defense_component,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stats(team: &str, scored: f64, allowed: f64, consistency: f64) -> TeamStats {
        TeamStats {
            team_id: team.into(),
            points_scored_per_game: scored,
            points_allowed_per_game: allowed,
            offensive_rank: 16,
            defensive_rank: 16,
            consistency,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert_relative_eq!(
            OFFENSE_WEIGHT + DEFENSE_WEIGHT + CONSISTENCY_WEIGHT,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn league_average_team_sits_at_the_midpoint() {
        let s = team_strength(&stats("AVG", 22.5, 22.5, 0.5)).unwrap();
        assert_relative_eq!(s.offense_component, 0.5, epsilon = 1e-9);
        assert_relative_eq!(s.defense_component, 0.5, epsilon = 1e-9);
        assert_relative_eq!(s.composite_score, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn strong_offense_weak_defense_shows_in_components() {
        let s = team_strength(&stats("DET", 31.5, 27.0, 0.6)).unwrap();
        assert_relative_eq!(s.offense_component, 0.7, epsilon = 1e-9);
        assert_relative_eq!(s.defense_component, 0.4, epsilon = 1e-9);
        // 0.45*0.7 + 0.35*0.4 + 0.20*0.6
        assert_relative_eq!(s.composite_score, 0.575, epsilon = 1e-9);
    }

    #[test]
    fn extreme_rates_clamp_instead_of_escaping_the_range() {
        let s = team_strength(&stats("HOT", 60.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(s.offense_component, 1.0, epsilon = 1e-9);
        assert_relative_eq!(s.defense_component, 1.0, epsilon = 1e-9);
        assert!(s.composite_score <= 1.0);
    }

    #[test]
    fn identical_input_identical_output() {
        let input = stats("PHI", 27.2, 17.8, 0.8);
        let a = team_strength(&input).unwrap();
        let b = team_strength(&input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_stats_are_rejected() {
        assert!(team_strength(&stats("BAD", f64::NAN, 20.0, 0.5)).is_err());
        assert!(team_strength(&stats("BAD", -3.0, 20.0, 0.5)).is_err());
        assert!(team_strength(&stats("BAD", 20.0, f64::INFINITY, 0.5)).is_err());
        assert!(team_strength(&stats("BAD", 20.0, 20.0, 1.3)).is_err());
        assert!(team_strength(&stats("BAD", 20.0, 20.0, -0.1)).is_err());
    }
}
