//! Recommendation module - the "For You" ranking.
//!
//! Ranking runs in three stages that are kept apart so each can be tested on
//! its own:
//!
//! 1. **fetch** - eligible compositions the buyer does not own (application layer)
//! 2. **score** - [`score_candidates`] blends preference weight with popularity
//! 3. **rank** - [`rank`] orders by score, newest first on ties, and truncates
//!
//! Everything here is pure; no I/O happens in this module.

mod errors;
mod limit;
mod popularity;
mod preference;
mod ranking;
mod scoring;

pub use errors::RecommendationError;
pub use limit::RecommendationLimit;
pub use popularity::{counts_for, PopularityCounts, PopularityStat};
pub use preference::PreferenceWeights;
pub use ranking::rank;
pub use scoring::{score_candidates, ScoredComposition, ScoringWeights};
