use chrono::NaiveDate;
use clap::Parser;

/// NFL regular-season weeks served by the schedule endpoints.
pub const REGULAR_SEASON_WEEKS: u8 = 18;

/// NFL schedule, odds and game-prediction API
#[derive(Parser, Debug, Clone)]
#[command(name = "gridiron-api", version, about)]
pub struct Config {
    /// RapidAPI key for the Tank01 NFL API (omit to serve synthetic data)
    #[arg(long, env = "TANK01_API_KEY")]
    pub tank01_api_key: Option<String>,

    /// Tank01 API base URL
    #[arg(
        long,
        env = "TANK01_BASE_URL",
        default_value = "https://tank01-nfl-live-in-game-real-time-statistics-nfl.p.rapidapi.com"
    )]
    pub tank01_base_url: String,

    /// HTTP listen address
    #[arg(long, env = "API_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// Season served by default
    #[arg(long, env = "SEASON", default_value = "2025")]
    pub season: u16,

    /// Opening Thursday of the regular season; drives current-week derivation
    #[arg(long, env = "NFL_SEASON_START", default_value = "2025-09-04")]
    pub season_start: NaiveDate,

    /// Confidence below which predictions are flagged as not actionable.
    /// Applied at the API layer only; the engine itself has no threshold.
    #[arg(long, env = "MODEL_CONFIDENCE_THRESHOLD", default_value = "0.6")]
    pub confidence_threshold: f64,

    /// Salt mixed into per-game noise seeds; changing it re-rolls every prediction
    #[arg(long, env = "PREDICTION_SEED", default_value = "0")]
    pub prediction_seed: u64,

    /// Expose the /debug/config endpoint
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!("confidence_threshold must be between 0.0 and 1.0");
        }
        if !(2000..=2100).contains(&self.season) {
            anyhow::bail!("season {} looks wrong", self.season);
        }
        Ok(())
    }

    /// Regular-season week containing the given date, clamped to [1, 18].
    /// Dates before opening day count as week 1.
    pub fn week_for(&self, date: NaiveDate) -> u8 {
        let days = (date - self.season_start).num_days();
        if days < 0 {
            return 1;
        }
        ((days / 7) + 1).min(REGULAR_SEASON_WEEKS as i64) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::parse_from(["gridiron-api"])
    }

    #[test]
    fn defaults_validate() {
        config().validate().unwrap();
    }

    #[test]
    fn bad_threshold_is_rejected() {
        let mut c = config();
        c.confidence_threshold = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn implausible_season_is_rejected() {
        let mut c = config();
        c.season = 1925;
        assert!(c.validate().is_err());
    }

    #[test]
    fn week_derivation_tracks_the_calendar() {
        let c = config(); // season starts 2025-09-04
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(c.week_for(d(2025, 8, 1)), 1); // preseason clamps to 1
        assert_eq!(c.week_for(d(2025, 9, 4)), 1); // opening night
        assert_eq!(c.week_for(d(2025, 9, 7)), 1); // first Sunday
        assert_eq!(c.week_for(d(2025, 9, 11)), 2);
        assert_eq!(c.week_for(d(2026, 1, 4)), 18);
        assert_eq!(c.week_for(d(2026, 6, 1)), 18); // offseason clamps to 18
    }
}
