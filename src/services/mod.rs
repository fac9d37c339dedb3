pub mod auth;
pub mod bootstrap;
pub mod scorer;
pub mod statistics;

pub use auth::{AuthService, Claims};
pub use bootstrap::ensure_admin;
pub use scorer::{BurnoutScorer, HttpScorer};
pub use statistics::{RecentPrediction, RiskLevel, RiskStatistics, UserStatistics};
