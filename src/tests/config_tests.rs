use crate::config::{Config, parse_budgets};

#[test]
fn test_parse_budgets_skips_malformed_entries() {
    let budgets = parse_budgets("Food=500, Travel = 200.5,broken,=10,Rent=abc");
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets["Food"], 500.0);
    assert_eq!(budgets["Travel"], 200.5);
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.port, 3000);
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.signal_policy.alpha, 0.3);
    assert_eq!(config.category_budgets["Food"], 8000.0);
    assert_eq!(config.monthly_budget_limit, rust_decimal_macros::dec!(3500));
    assert_eq!(config.app_log_capacity, 10_000);
}
