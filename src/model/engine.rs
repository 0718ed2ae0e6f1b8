//! Game-outcome prediction engine.
//!
//! Takes two strength summaries and a game context, returns a correlated
//! bundle of outputs: projected score, spread, total, win probabilities, a
//! margin bucket, a confidence score, and a human-readable rationale. The
//! only randomness is the injected score noise; win probability is computed
//! from the PRE-noise expected scores, so the probability and the projected
//! margin can disagree slightly. The noise models game variance, not
//! uncertainty about team quality.
//!
//! The engine enforces no minimum-confidence policy. Whether a low-confidence
//! prediction is worth surfacing is the caller's decision.

use serde::{Deserialize, Serialize};

use crate::data::models::GameContext;
use crate::error::PredictionError;

use super::classifier::{classify_spread, GameType};
use super::noise::ScoreNoise;
use super::strength::{TeamStrength, LEAGUE_BASELINE_PPG};

/// Fixed home-field addend, in points. Applied to the home team only.
pub const HOME_FIELD_POINTS: f64 = 2.5;

/// Standard deviation of the per-score Gaussian noise, in points.
pub const NOISE_STD_DEV_POINTS: f64 = 3.0;

/// Logistic scale for win probability. Calibrated so a 7-point favorite
/// lands at ~72%, inside the historical 70-75% band.
pub const LOGISTIC_SCALE: f64 = 0.135;

// Predicted scores are clamped to this range.
const SCORE_FLOOR: f64 = 0.0;
const SCORE_CEILING: f64 = 50.0;

// Confidence: base plus a term for the composite-strength gap, discounted
// for divisional games.
const CONFIDENCE_BASE: f64 = 0.45;
const CONFIDENCE_GAP_WEIGHT: f64 = 1.2;
const DIVISIONAL_CONFIDENCE_FACTOR: f64 = 0.85;

// Component thresholds for the key-factor rules.
const STRONG_UNIT: f64 = 0.65;
const WEAK_UNIT: f64 = 0.45;
const NOTABLE_GAP: f64 = 0.20;

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// One predicted game outcome. Created whole, never mutated; a recomputation
/// replaces the entire value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub game_id: String,
    pub predicted_home_score: f64,
    pub predicted_away_score: f64,
    /// Signed, home-relative: positive means the home team is favored
    pub spread: f64,
    pub total: f64,
    pub win_probability_home: f64,
    pub win_probability_away: f64,
    pub game_type: GameType,
    /// In [0,1]; thresholds are caller-side policy
    pub confidence_score: f64,
    /// One entry per matched rule, in rule-evaluation order
    pub key_factors: Vec<String>,
    pub reasoning: String,
}

/// Expected points for an offense against a given defense, before noise and
/// home-field. A league-average pairing (0.5 vs 0.5) nets the baseline.
fn matchup_points(offense_component: f64, opponent_defense_component: f64) -> f64 {
    LEAGUE_BASELINE_PPG * (1.0 + offense_component - opponent_defense_component)
}

fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn check_strength(label: &str, strength: &TeamStrength) -> Result<(), PredictionError> {
    for (name, value) in [
        ("composite_score", strength.composite_score),
        ("offense_component", strength.offense_component),
        ("defense_component", strength.defense_component),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(PredictionError::InvalidInput(format!(
                "{label} team {}: {name} {value} outside normalized range [0, 1]",
                strength.team_id
            )));
        }
    }
    Ok(())
}

/// Produce a prediction for one game.
///
/// Deterministic given the same inputs and the same noise source state; the
/// noise source is the caller's to seed.
pub fn predict(
    home: &TeamStrength,
    away: &TeamStrength,
    ctx: &GameContext,
    noise: &mut dyn ScoreNoise,
) -> Result<Prediction, PredictionError> {
    if ctx.home_team_id == ctx.away_team_id {
        return Err(PredictionError::InvalidInput(format!(
            "home and away team are both {}",
            ctx.home_team_id
        )));
    }
    if home.team_id != ctx.home_team_id || away.team_id != ctx.away_team_id {
        return Err(PredictionError::InvalidInput(format!(
            "context is {} vs {} but strengths are {} vs {}",
            ctx.home_team_id, ctx.away_team_id, home.team_id, away.team_id
        )));
    }
    check_strength("home", home)?;
    check_strength("away", away)?;

    // Pre-noise expectations drive the win probability.
    let expected_home =
        matchup_points(home.offense_component, away.defense_component) + HOME_FIELD_POINTS;
    let expected_away = matchup_points(away.offense_component, home.defense_component);
    let expected_diff = expected_home - expected_away;

    let predicted_home_score = round_tenth(
        (expected_home + noise.sample(NOISE_STD_DEV_POINTS)).clamp(SCORE_FLOOR, SCORE_CEILING),
    );
    let predicted_away_score = round_tenth(
        (expected_away + noise.sample(NOISE_STD_DEV_POINTS)).clamp(SCORE_FLOOR, SCORE_CEILING),
    );

    let spread = round_tenth(predicted_home_score - predicted_away_score);
    let total = round_tenth(predicted_home_score + predicted_away_score);

    let win_probability_home = logistic(LOGISTIC_SCALE * expected_diff);
    let win_probability_away = 1.0 - win_probability_home;

    let game_type = classify_spread(spread.abs());

    let strength_gap = (home.composite_score - away.composite_score).abs();
    let mut confidence_score = (CONFIDENCE_BASE + CONFIDENCE_GAP_WEIGHT * strength_gap).clamp(0.0, 1.0);
    if ctx.is_divisional {
        confidence_score *= DIVISIONAL_CONFIDENCE_FACTOR;
    }

    let key_factors = evaluate_key_factors(home, away, ctx);
    let reasoning = build_reasoning(
        ctx,
        predicted_home_score,
        predicted_away_score,
        spread,
        game_type,
    );

    let prediction = Prediction {
        game_id: ctx.game_id.clone(),
        predicted_home_score,
        predicted_away_score,
        spread,
        total,
        win_probability_home,
        win_probability_away,
        game_type,
        confidence_score,
        key_factors,
        reasoning,
    };
    verify_invariants(&prediction)?;
    Ok(prediction)
}

/// Independently-evaluated rules, fixed order. The order is evaluation
/// order, not an importance ranking.
fn evaluate_key_factors(
    home: &TeamStrength,
    away: &TeamStrength,
    ctx: &GameContext,
) -> Vec<String> {
    let mut factors = Vec::new();

    if home.offense_component > STRONG_UNIT && away.defense_component < WEAK_UNIT {
        factors.push(format!(
            "{} offense matches up well against a vulnerable {} defense",
            ctx.home_team_id, ctx.away_team_id
        ));
    }
    if away.offense_component > STRONG_UNIT && home.defense_component < WEAK_UNIT {
        factors.push(format!(
            "{} offense matches up well against a vulnerable {} defense",
            ctx.away_team_id, ctx.home_team_id
        ));
    }
    if home.composite_score - away.composite_score > NOTABLE_GAP {
        factors.push(format!(
            "Overall strength gap favors {}",
            ctx.home_team_id
        ));
    }
    if away.composite_score - home.composite_score > NOTABLE_GAP {
        factors.push(format!(
            "Overall strength gap favors {}",
            ctx.away_team_id
        ));
    }
    if ctx.is_divisional {
        factors.push(format!(
            "Divisional rivalry: {} and {} know each other well, expect added volatility",
            ctx.home_team_id, ctx.away_team_id
        ));
    }
    if let Some(weather) = ctx.weather.as_deref().filter(|w| !w.is_empty()) {
        factors.push(format!("Weather factor: {weather}"));
    }

    factors
}

/// Rationale text, assembled only from already-computed fields; no hidden
/// randomness, fully reproducible from the prediction itself.
fn build_reasoning(
    ctx: &GameContext,
    home_score: f64,
    away_score: f64,
    spread: f64,
    game_type: GameType,
) -> String {
    let mut reasoning = if spread > 0.0 {
        format!(
            "Projected final: {} {:.1}, {} {:.1}; {} favored by {:.1} in {}.",
            ctx.home_team_id,
            home_score,
            ctx.away_team_id,
            away_score,
            ctx.home_team_id,
            spread,
            game_type.margin_phrase(),
        )
    } else if spread < 0.0 {
        format!(
            "Projected final: {} {:.1}, {} {:.1}; {} favored by {:.1} in {}.",
            ctx.home_team_id,
            home_score,
            ctx.away_team_id,
            away_score,
            ctx.away_team_id,
            -spread,
            game_type.margin_phrase(),
        )
    } else {
        format!(
            "Projected final: {} {:.1}, {} {:.1}; dead even, {}.",
            ctx.home_team_id,
            home_score,
            ctx.away_team_id,
            away_score,
            game_type.margin_phrase(),
        )
    };
    if ctx.is_divisional {
        reasoning.push_str(" Divisional games tend to run closer than the numbers suggest.");
    }
    reasoning
}

/// Post-computation invariant checks. A violation here is a defect in the
/// engine and is reported, never patched over.
fn verify_invariants(p: &Prediction) -> Result<(), PredictionError> {
    let prob_sum = p.win_probability_home + p.win_probability_away;
    if (prob_sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(PredictionError::OutOfRangeResult(format!(
            "win probabilities sum to {prob_sum}, expected 1.0"
        )));
    }
    for (name, value) in [
        ("win_probability_home", p.win_probability_home),
        ("win_probability_away", p.win_probability_away),
        ("confidence_score", p.confidence_score),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(PredictionError::OutOfRangeResult(format!(
                "{name} is {value}, expected [0, 1]"
            )));
        }
    }
    for (name, value) in [
        ("predicted_home_score", p.predicted_home_score),
        ("predicted_away_score", p.predicted_away_score),
    ] {
        if !(SCORE_FLOOR..=SCORE_CEILING).contains(&value) {
            return Err(PredictionError::OutOfRangeResult(format!(
                "{name} is {value}, expected [{SCORE_FLOOR}, {SCORE_CEILING}]"
            )));
        }
    }
    if !p.spread.is_finite() || !p.total.is_finite() {
        return Err(PredictionError::OutOfRangeResult(
            "spread or total is not finite".into(),
        ));
    }
    Ok(())
}
