use thiserror::Error;

/// Failures the prediction core can produce.
///
/// A cache miss is NOT an error: it is normal control flow and is modelled
/// as `Option::None` by the cache store. Upstream fetch failures are the
/// data provider's responsibility and travel as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Malformed stats or game context (e.g. a strength score outside its
    /// normalized range, or a team matched against itself).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant was violated after computation. This is a
    /// defect: the result is discarded, never patched up.
    #[error("result out of range: {0}")]
    OutOfRangeResult(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_violated_check() {
        let e = PredictionError::InvalidInput("home and away team are both PHI".into());
        assert!(e.to_string().contains("invalid input"));
        assert!(e.to_string().contains("PHI"));

        let e = PredictionError::OutOfRangeResult("win probabilities sum to 1.2".into());
        assert!(e.to_string().starts_with("result out of range"));
    }
}
