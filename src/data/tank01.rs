//! Live data source backed by the Tank01 NFL API (via RapidAPI).
//!
//! Responses arrive as loosely-typed JSON with most numbers encoded as
//! strings, so parsing is tolerant: a malformed game row is skipped with a
//! log line rather than failing the whole fetch, while transport and HTTP
//! errors propagate to the caller unchanged.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::models::{BookOdds, Game, GameOdds, MoneyLine, SpreadLine, TeamStats, TotalLine};
use super::provider::{assign_ranks, StatsProvider};
use super::teams;

/// Minimum gap between upstream requests; RapidAPI free tiers throttle hard.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Sportsbooks the odds endpoint may carry; absent books are simply omitted.
const SPORTSBOOKS: [&str; 8] = [
    "betmgm",
    "bet365",
    "fanduel",
    "ballybet",
    "espnbet",
    "betrivers",
    "caesars_sportsbook",
    "draftkings",
];

pub struct Tank01Provider {
    http: Client,
    base_url: String,
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

impl Tank01Provider {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        // RapidAPI routes on the host header, which must match the base URL.
        let host = base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-RapidAPI-Key",
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?,
        );
        headers.insert(
            "X-RapidAPI-Host",
            HeaderValue::from_str(&host).context("base URL host is not a valid header value")?,
        );
        headers.insert("User-Agent", HeaderValue::from_static("gridiron-api/0.1"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Tank01Provider {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            last_request: tokio::sync::Mutex::new(None),
        })
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        self.throttle().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Tank01 request: {} {:?}", url, params);

        let resp = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Tank01 request failed: {endpoint}"))?;

        if !resp.status().is_success() {
            anyhow::bail!("Tank01 error on {}: {}", endpoint, resp.status());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse Tank01 response from {endpoint}"))
    }
}

#[async_trait]
impl StatsProvider for Tank01Provider {
    fn name(&self) -> &str {
        "Tank01"
    }

    async fn fetch_games_for_week(&self, week: u8, season: u16) -> Result<Vec<Game>> {
        let params = [
            ("week", week.to_string()),
            ("seasonType", "reg".to_string()),
            ("season", season.to_string()),
        ];
        let raw = self.get_json("/getNFLGamesForWeek", &params).await?;
        let games = parse_schedule(&raw);
        info!("Parsed {} games for week {} from Tank01", games.len(), week);
        Ok(games)
    }

    async fn fetch_team_stats(&self, _season: u16) -> Result<Vec<TeamStats>> {
        let params = [
            ("teamStats", "true".to_string()),
            ("topPerformers", "false".to_string()),
        ];
        let raw = self.get_json("/getNFLTeams", &params).await?;
        let stats = parse_team_stats(&raw);
        info!("Parsed stats for {} teams from Tank01", stats.len());
        Ok(stats)
    }

    async fn fetch_game_odds(&self, game_id: &str) -> Result<Option<GameOdds>> {
        let params = [
            ("gameID", game_id.to_string()),
            ("itemFormat", "map".to_string()),
            ("impliedTotals", "true".to_string()),
        ];
        let raw = self.get_json("/getNFLBettingOdds", &params).await?;
        Ok(parse_odds(&raw, game_id))
    }
}

fn parse_schedule(raw: &serde_json::Value) -> Vec<Game> {
    let rows = if let Some(body) = raw["body"].as_array() {
        body
    } else if let Some(top) = raw.as_array() {
        top
    } else {
        warn!("Unexpected schedule response shape, no games parsed");
        return vec![];
    };

    rows.iter()
        .filter_map(|row| {
            let game_id = row["gameID"].as_str()?.to_string();
            let home = row["home"].as_str()?.to_string();
            let away = row["away"].as_str()?.to_string();

            // Week arrives as "Week 1".
            let week = row["gameWeek"]
                .as_str()
                .and_then(|w| w.strip_prefix("Week "))
                .and_then(|w| w.parse().ok())
                .unwrap_or(1);
            let season = row["season"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .or_else(|| row["season"].as_u64().map(|s| s as u16))
                .unwrap_or(2025);

            let neutral_site = row["neutralSite"].as_str() == Some("True");
            let game_time = format_game_time(
                row["gameTime"].as_str().unwrap_or_default(),
                row["gameDate"].as_str().unwrap_or_default(),
            );

            Some(Game {
                game_id,
                home_team: teams::full_team_name(&home),
                away_team: teams::full_team_name(&away),
                venue: teams::venue_for(&home, neutral_site),
                home_abbreviation: home,
                away_abbreviation: away,
                game_time,
                week,
                season,
                status: row["gameStatus"]
                    .as_str()
                    .unwrap_or("Scheduled")
                    .to_lowercase(),
                neutral_site,
            })
        })
        .collect()
}

fn parse_team_stats(raw: &serde_json::Value) -> Vec<TeamStats> {
    let rows = match raw["body"].as_array() {
        Some(rows) => rows,
        None => {
            warn!("Unexpected teams response shape, no stats parsed");
            return vec![];
        }
    };

    let mut stats: Vec<TeamStats> = rows
        .iter()
        .filter_map(|row| {
            let team_id = row["teamAbv"].as_str()?.to_string();
            let scored = number(&row["ppg"])?;
            let allowed = number(&row["oppg"])?;
            Some(TeamStats {
                team_id,
                points_scored_per_game: scored,
                points_allowed_per_game: allowed,
                offensive_rank: 0,
                defensive_rank: 0,
                consistency: 0.0,
            })
        })
        .collect();

    assign_ranks(&mut stats);
    // The upstream publishes no variance stat; proxy consistency with unit
    // balance, since rosters with one elite and one bottom-five unit swing
    // harder week to week.
    for s in &mut stats {
        let spread = (s.offensive_rank as f64 - s.defensive_rank as f64).abs();
        s.consistency = 1.0 - (spread / 31.0) * 0.5;
    }
    stats
}

/// Numbers in Tank01 payloads are usually strings ("23.4"), occasionally
/// real JSON numbers.
fn number(v: &serde_json::Value) -> Option<f64> {
    v.as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| v.as_f64())
}

fn parse_odds(raw: &serde_json::Value, game_id: &str) -> Option<GameOdds> {
    let entry = &raw["body"][game_id];
    if entry.is_null() {
        warn!("Game {} not found in betting odds response", game_id);
        return None;
    }

    let text = |v: &serde_json::Value| v.as_str().unwrap_or_default().to_string();

    let mut sportsbooks = HashMap::new();
    for book in SPORTSBOOKS {
        let lines = &entry[book];
        if lines.is_null() {
            continue;
        }
        sportsbooks.insert(
            book.to_string(),
            BookOdds {
                spread: SpreadLine {
                    home: text(&lines["homeTeamSpread"]),
                    away: text(&lines["awayTeamSpread"]),
                    home_odds: text(&lines["homeTeamSpreadOdds"]),
                    away_odds: text(&lines["awayTeamSpreadOdds"]),
                },
                total: TotalLine {
                    over: text(&lines["totalOver"]),
                    under: text(&lines["totalUnder"]),
                    over_odds: text(&lines["totalOverOdds"]),
                    under_odds: text(&lines["totalUnderOdds"]),
                },
                moneyline: MoneyLine {
                    home: text(&lines["homeTeamMLOdds"]),
                    away: text(&lines["awayTeamMLOdds"]),
                },
            },
        );
    }

    Some(GameOdds {
        game_id: game_id.to_string(),
        home_team: text(&entry["homeTeam"]),
        away_team: text(&entry["awayTeam"]),
        game_date: text(&entry["gameDate"]),
        last_updated: text(&entry["last_updated_e_time"]),
        sportsbooks,
    })
}

/// Combine Tank01's "8:20p" + "20250904" into ISO-8601 (Eastern kickoff
/// times, as the upstream publishes them).
fn format_game_time(time_str: &str, date_str: &str) -> String {
    if date_str.len() != 8 || !date_str.bytes().all(|b| b.is_ascii_digit()) {
        return "1970-01-01T00:00:00Z".to_string();
    }
    let (year, rest) = date_str.split_at(4);
    let (month, day) = rest.split_at(2);

    let clock = time_str.split_once(':').and_then(|(h, rest)| {
        let hour: u32 = h.parse().ok()?;
        if rest.is_empty() || !rest.is_ascii() {
            return None;
        }
        let (minute_str, period) = rest.split_at(rest.len() - 1);
        let minute: u32 = minute_str.parse().ok()?;
        let hour = match (period, hour) {
            ("p", h) if h != 12 => h + 12,
            ("a", 12) => 0,
            (_, h) => h,
        };
        Some((hour, minute))
    });

    match clock {
        Some((hour, minute)) => {
            format!("{year}-{month}-{day}T{hour:02}:{minute:02}:00-04:00")
        }
        None => format!("{year}-{month}-{day}T00:00:00-04:00"),
    }
}
