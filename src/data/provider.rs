use std::cmp::Ordering;

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Game, GameOdds, TeamStats};

/// Trait every schedule/stats/odds source must implement. The prediction
/// core never learns whether data came from the live upstream or the
/// synthetic generator.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// All games scheduled for the given week.
    async fn fetch_games_for_week(&self, week: u8, season: u16) -> Result<Vec<Game>>;

    /// Current stat snapshot for every team in the league.
    async fn fetch_team_stats(&self, season: u16) -> Result<Vec<TeamStats>>;

    /// Betting lines for one game; `None` when the upstream has no odds
    /// for that game ID.
    async fn fetch_game_odds(&self, game_id: &str) -> Result<Option<GameOdds>>;

    /// Human-readable name for logging and the service-info endpoints.
    fn name(&self) -> &str;
}

/// Fill in offensive/defensive ranks across a league snapshot: offense ranked
/// by points scored (descending), defense by points allowed (ascending),
/// 1 = best. Ties break on team ID so ranks are stable between fetches.
pub fn assign_ranks(stats: &mut [TeamStats]) {
    let mut order: Vec<usize> = (0..stats.len()).collect();

    order.sort_by(|&a, &b| {
        stats[b]
            .points_scored_per_game
            .partial_cmp(&stats[a].points_scored_per_game)
            .unwrap_or(Ordering::Equal)
            .then_with(|| stats[a].team_id.cmp(&stats[b].team_id))
    });
    for (rank, &idx) in order.iter().enumerate() {
        stats[idx].offensive_rank = rank as u32 + 1;
    }

    order.sort_by(|&a, &b| {
        stats[a]
            .points_allowed_per_game
            .partial_cmp(&stats[b].points_allowed_per_game)
            .unwrap_or(Ordering::Equal)
            .then_with(|| stats[a].team_id.cmp(&stats[b].team_id))
    });
    for (rank, &idx) in order.iter().enumerate() {
        stats[idx].defensive_rank = rank as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(team: &str, scored: f64, allowed: f64) -> TeamStats {
        TeamStats {
            team_id: team.into(),
            points_scored_per_game: scored,
            points_allowed_per_game: allowed,
            offensive_rank: 0,
            defensive_rank: 0,
            consistency: 0.5,
        }
    }

    #[test]
    fn ranks_best_offense_and_defense_first() {
        let mut stats = vec![raw("AAA", 28.0, 24.0), raw("BBB", 31.0, 18.0), raw("CCC", 17.0, 21.0)];
        assign_ranks(&mut stats);
        let by_id = |id: &str| stats.iter().find(|s| s.team_id == id).unwrap();
        assert_eq!(by_id("BBB").offensive_rank, 1);
        assert_eq!(by_id("AAA").offensive_rank, 2);
        assert_eq!(by_id("CCC").offensive_rank, 3);
        assert_eq!(by_id("BBB").defensive_rank, 1);
        assert_eq!(by_id("CCC").defensive_rank, 2);
        assert_eq!(by_id("AAA").defensive_rank, 3);
    }

    #[test]
    fn ties_break_on_team_id_for_stable_ranks() {
        let mut stats = vec![raw("ZZZ", 24.0, 20.0), raw("AAA", 24.0, 20.0)];
        assign_ranks(&mut stats);
        let by_id = |id: &str| stats.iter().find(|s| s.team_id == id).unwrap();
        assert_eq!(by_id("AAA").offensive_rank, 1);
        assert_eq!(by_id("ZZZ").offensive_rank, 2);
        assert_eq!(by_id("AAA").defensive_rank, 1);
        assert_eq!(by_id("ZZZ").defensive_rank, 2);
    }
}
