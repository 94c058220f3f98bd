//! Validated result-count limit.

use serde::Serialize;

use super::RecommendationError;

/// Maximum number of recommendations to return. Always positive.
///
/// There is no upper bound: ranking truncates to whatever is eligible, so a
/// limit larger than the catalog simply returns every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecommendationLimit(u32);

impl RecommendationLimit {
    pub const DEFAULT: RecommendationLimit = RecommendationLimit(20);

    /// Validates a caller-supplied limit.
    ///
    /// Values beyond `u32::MAX` saturate.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `requested` is zero or negative.
    pub fn new(requested: i64) -> Result<Self, RecommendationError> {
        if requested <= 0 {
            return Err(RecommendationError::invalid_argument(
                "limit",
                format!("must be a positive integer, got {}", requested),
            ));
        }
        Ok(Self(u32::try_from(requested).unwrap_or(u32::MAX)))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl Default for RecommendationLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_twenty() {
        assert_eq!(RecommendationLimit::default().get(), 20);
    }

    #[test]
    fn rejects_zero_and_negative() {
        let err = RecommendationLimit::new(0).unwrap_err();
        assert!(matches!(err, RecommendationError::InvalidArgument { ref field, .. } if field == "limit"));
        assert!(RecommendationLimit::new(-1).is_err());
    }

    #[test]
    fn accepts_any_positive_value() {
        assert_eq!(RecommendationLimit::new(1).unwrap().get(), 1);
        assert_eq!(RecommendationLimit::new(150).unwrap().get(), 150);
        assert_eq!(RecommendationLimit::new(1_000_000).unwrap().as_usize(), 1_000_000);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(RecommendationLimit::new(i64::MAX).unwrap().get(), u32::MAX);
    }
}
