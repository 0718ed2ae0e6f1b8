use serde::{Deserialize, Serialize};

/// Weekly snapshot of a team's performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    /// Team abbreviation, e.g. "PHI"
    pub team_id: String,
    pub points_scored_per_game: f64,
    pub points_allowed_per_game: f64,
    /// League rank by scoring offense (1 = best)
    pub offensive_rank: u32,
    /// League rank by scoring defense (1 = best)
    pub defensive_rank: u32,
    /// Week-to-week steadiness, 0.0 (erratic) to 1.0 (metronomic)
    pub consistency: f64,
}

/// One scheduled game, as served by `/games/*` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Upstream game ID, formatted `YYYYMMDD_AWAY@HOME`
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_abbreviation: String,
    pub away_abbreviation: String,
    /// Kickoff in ISO-8601
    pub game_time: String,
    pub week: u8,
    pub season: u16,
    /// "scheduled" | "live" | "final" (lower-cased upstream status)
    pub status: String,
    pub venue: String,
    pub neutral_site: bool,
}

/// Immutable description of one matchup, fed to the prediction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub game_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    /// Teams share a division; modelled as added unpredictability
    pub is_divisional: bool,
    pub week: u8,
    pub season: u16,
    pub weather: Option<String>,
}

/// Betting lines for one game across sportsbooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOdds {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub game_date: String,
    pub last_updated: String,
    /// book name → lines; books the upstream omits are absent
    pub sportsbooks: std::collections::HashMap<String, BookOdds>,
}

/// One sportsbook's lines. Prices stay strings ("-110", "+3.5"): the
/// upstream serves them that way and we never do arithmetic on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookOdds {
    pub spread: SpreadLine,
    pub total: TotalLine,
    pub moneyline: MoneyLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadLine {
    pub home: String,
    pub away: String,
    pub home_odds: String,
    pub away_odds: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalLine {
    pub over: String,
    pub under: String,
    pub over_odds: String,
    pub under_odds: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyLine {
    pub home: String,
    pub away: String,
}

/// Values the service caches between weekly refreshes. One enum so a single
/// store serves every endpoint; each variant lives under its own key.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Games(Vec<Game>),
    Stats(Vec<TeamStats>),
    Odds(Box<GameOdds>),
    Prediction(Box<crate::model::Prediction>),
}
