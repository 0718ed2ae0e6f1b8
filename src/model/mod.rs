pub mod classifier;
pub mod engine;
pub mod noise;
pub mod strength;

pub use classifier::{classify_spread, GameType};
pub use engine::{predict, Prediction};
pub use noise::{GaussianNoise, ScoreNoise};
pub use strength::{team_strength, TeamStrength};
