pub mod models;
pub mod portfolio;
pub mod rebalancing;
pub mod stress;

pub use models::*;
pub use portfolio::{
    adjust_for_market_regime, build_equal_weight_portfolio, portfolio_action,
    portfolio_confidence, portfolio_risk_triggers, PortfolioAnalyzer,
};
pub use rebalancing::rebalancing_signal;
pub use stress::{sector_beta, sector_drawdown_stress, stress_test_portfolio};
