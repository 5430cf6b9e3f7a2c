use analysis_core::{FundamentalsRecord, Metric};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display-quality label for a single metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricHealth {
    Healthy,
    Watch,
    /// Lower-is-better metric above its weak threshold
    Risky,
    /// Higher-is-better metric below its weak threshold
    Weak,
    Neutral,
    NotAvailable,
}

impl MetricHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricHealth::Healthy => "Healthy",
            MetricHealth::Watch => "Watch",
            MetricHealth::Risky => "Risky",
            MetricHealth::Weak => "Weak",
            MetricHealth::Neutral => "Neutral",
            MetricHealth::NotAvailable => "Not Available",
        }
    }
}

impl fmt::Display for MetricHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (good, weak) thresholds; `None` for metrics shown without a judgement
fn thresholds(metric: Metric) -> Option<(f64, f64)> {
    match metric {
        Metric::Roe | Metric::Roce => Some((0.15, 0.10)),
        Metric::DebtEquity => Some((1.0, 2.0)),
        Metric::InterestCover => Some((3.0, 1.5)),
        Metric::Pe => Some((25.0, 40.0)),
        Metric::RevenueGrowth | Metric::EpsGrowth => Some((0.10, 0.05)),
        Metric::Pb | Metric::EvEbitda | Metric::NetMargin | Metric::CurrentRatio => None,
    }
}

fn lower_is_better(metric: Metric) -> bool {
    matches!(metric, Metric::Pe | Metric::DebtEquity)
}

pub fn evaluate_metric(metric: Metric, value: Option<f64>) -> MetricHealth {
    let value = match value {
        Some(v) => v,
        None => return MetricHealth::NotAvailable,
    };
    let (good, weak) = match thresholds(metric) {
        Some(t) => t,
        None => return MetricHealth::Neutral,
    };

    if lower_is_better(metric) {
        if value <= good {
            MetricHealth::Healthy
        } else if value <= weak {
            MetricHealth::Watch
        } else {
            MetricHealth::Risky
        }
    } else if value >= good {
        MetricHealth::Healthy
    } else if value >= weak {
        MetricHealth::Watch
    } else {
        MetricHealth::Weak
    }
}

/// Health label for every metric, in `Metric::ALL` order.
pub fn metric_health_table(fund: &FundamentalsRecord) -> Vec<(Metric, Option<f64>, MetricHealth)> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = fund.get(metric);
            (metric, value, evaluate_metric(metric, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_not_available() {
        assert_eq!(evaluate_metric(Metric::Roe, None), MetricHealth::NotAvailable);
        assert_eq!(evaluate_metric(Metric::Pb, None), MetricHealth::NotAvailable);
    }

    #[test]
    fn test_unthresholded_metric_is_neutral() {
        assert_eq!(evaluate_metric(Metric::Pb, Some(3.2)), MetricHealth::Neutral);
        assert_eq!(evaluate_metric(Metric::CurrentRatio, Some(0.4)), MetricHealth::Neutral);
    }

    #[test]
    fn test_lower_is_better_metrics() {
        assert_eq!(evaluate_metric(Metric::Pe, Some(22.0)), MetricHealth::Healthy);
        assert_eq!(evaluate_metric(Metric::Pe, Some(35.0)), MetricHealth::Watch);
        assert_eq!(evaluate_metric(Metric::Pe, Some(55.0)), MetricHealth::Risky);
        assert_eq!(evaluate_metric(Metric::DebtEquity, Some(2.0)), MetricHealth::Watch);
    }

    #[test]
    fn test_higher_is_better_metrics() {
        assert_eq!(evaluate_metric(Metric::Roe, Some(0.15)), MetricHealth::Healthy);
        assert_eq!(evaluate_metric(Metric::InterestCover, Some(2.0)), MetricHealth::Watch);
        assert_eq!(evaluate_metric(Metric::EpsGrowth, Some(-0.02)), MetricHealth::Weak);
    }

    #[test]
    fn test_table_covers_every_metric() {
        let fund = FundamentalsRecord::new().with(Metric::Roe, 0.2);
        let table = metric_health_table(&fund);
        assert_eq!(table.len(), Metric::ALL.len());
        assert_eq!(table[3], (Metric::Roe, Some(0.2), MetricHealth::Healthy));
        assert_eq!(table[0].2, MetricHealth::NotAvailable);
    }
}
