use serde::{Deserialize, Serialize};

/// How lopsided a game projects to be, bucketed by spread magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Close,
    Competitive,
    ModerateBlowout,
    Blowout,
}

impl GameType {
    /// Short phrase used when assembling prediction rationale.
    pub fn margin_phrase(&self) -> &'static str {
        match self {
            GameType::Close => "a coin-flip finish",
            GameType::Competitive => "a one-score game",
            GameType::ModerateBlowout => "a comfortable win",
            GameType::Blowout => "a rout",
        }
    }
}

/// Bucket a spread magnitude. Boundaries belong to the lower bucket:
/// 3 is still close, 7 still competitive, 14 still a moderate blowout.
pub fn classify_spread(spread_magnitude: f64) -> GameType {
    let m = spread_magnitude.abs();
    if m <= 3.0 {
        GameType::Close
    } else if m <= 7.0 {
        GameType::Competitive
    } else if m <= 14.0 {
        GameType::ModerateBlowout
    } else {
        GameType::Blowout
    }
}
