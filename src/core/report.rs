use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::core::error::CostError;
use crate::core::models::cost::{CostByTime, Report, ServiceCost, UNKNOWN_SERVICE};
use crate::core::source::{
    CostGroup, CostQuery, CostSource, TimeBucket, GROUP_BY_SERVICE, METRIC_BLENDED_COST,
};

/// Builds per-service cost reports from a [`CostSource`].
pub struct ReportBuilder<S> {
    source: S,
}

impl<S: CostSource> ReportBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Query blended cost by service for the `lookback_days` ending at `today`.
    ///
    /// Exactly one query is issued. Groups without a complete blended-cost
    /// metric are skipped with a warning; the period itself is always kept.
    pub async fn build_report(
        &self,
        lookback_days: i64,
        today: NaiveDate,
    ) -> Result<Report, CostError> {
        if lookback_days <= 0 {
            return Err(CostError::InvalidArgument(lookback_days));
        }

        let query = lookback_query(lookback_days, today)?;
        debug!(start = %query.start_str(), end = %query.end_str(), "Querying cost data");

        let response = self
            .source
            .query(&query)
            .await
            .map_err(CostError::Collaborator)?;

        let periods: Vec<CostByTime> = response
            .results_by_time
            .iter()
            .map(period_costs)
            .collect();
        debug!(periods = periods.len(), "Cost data assembled");

        Ok(Report { periods })
    }
}

fn lookback_query(lookback_days: i64, today: NaiveDate) -> Result<CostQuery, CostError> {
    let start = Duration::try_days(lookback_days)
        .and_then(|span| today.checked_sub_signed(span))
        .ok_or(CostError::InvalidArgument(lookback_days))?;

    Ok(CostQuery {
        start,
        end: today,
        metrics: vec![METRIC_BLENDED_COST.to_string()],
        group_by: GROUP_BY_SERVICE.to_string(),
    })
}

fn period_costs(bucket: &TimeBucket) -> CostByTime {
    let start = bucket.time_period.start.clone();
    let end = bucket.time_period.end.clone();
    let service_costs = bucket
        .groups
        .iter()
        .filter_map(|group| service_cost(group, &start, &end))
        .collect();

    CostByTime {
        start,
        end,
        service_costs,
    }
}

fn service_cost(group: &CostGroup, start: &str, end: &str) -> Option<ServiceCost> {
    let service_name = group
        .keys
        .first()
        .map(String::as_str)
        .unwrap_or(UNKNOWN_SERVICE);

    let metric = group.metrics.get(METRIC_BLENDED_COST);
    match metric.and_then(|m| Some((m.amount.as_ref()?, m.unit.as_ref()?))) {
        Some((amount, unit)) => Some(ServiceCost {
            service_name: service_name.to_string(),
            amount: amount.clone(),
            unit: unit.clone(),
        }),
        None => {
            warn!(
                metric = METRIC_BLENDED_COST,
                service = service_name,
                start,
                end,
                "Metric not found or incomplete, skipping service"
            );
            None
        }
    }
}
