pub mod models;
pub mod provider;
pub mod synthetic;
pub mod tank01;
pub mod teams;

pub use provider::StatsProvider;
pub use synthetic::SyntheticProvider;
pub use tank01::Tank01Provider;

use chrono::NaiveDate;

/// Split an upstream game ID (`YYYYMMDD_AWAY@HOME`) into its parts.
pub fn parse_game_id(game_id: &str) -> Option<(NaiveDate, &str, &str)> {
    let (date_part, matchup) = game_id.split_once('_')?;
    let (away, home) = matchup.split_once('@')?;
    if away.is_empty() || home.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    Some((date, away, home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_ids_split_into_date_and_teams() {
        let (date, away, home) = parse_game_id("20250904_DAL@PHI").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        assert_eq!(away, "DAL");
        assert_eq!(home, "PHI");
    }

    #[test]
    fn malformed_game_ids_are_rejected() {
        assert!(parse_game_id("").is_none());
        assert!(parse_game_id("20250904").is_none());
        assert!(parse_game_id("20250904_DALPHI").is_none());
        assert!(parse_game_id("20250904_@PHI").is_none());
        assert!(parse_game_id("20250904_DAL@").is_none());
        assert!(parse_game_id("notadate_DAL@PHI").is_none());
        assert!(parse_game_id("20251332_DAL@PHI").is_none()); // month 13
    }
}
