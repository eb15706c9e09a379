pub mod performance;
pub mod risk_reward;

pub use performance::{OutcomeCounts, PairMetrics, PerformanceAnalyzer, PerformanceStats};
pub use risk_reward::{risk_reward_report, RiskRewardItem, RiskRewardReport};
