pub mod aws;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::BoxError;

/// Date format the billing API expects and returns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Metric requested from the billing API.
pub const METRIC_BLENDED_COST: &str = "BlendedCost";
/// Dimension costs are grouped by.
pub const GROUP_BY_SERVICE: &str = "SERVICE";

/// Parameters of one "get cost and usage" call. Granularity is always monthly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub metrics: Vec<String>,
    pub group_by: String,
}

impl CostQuery {
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Response shape of a cost query, mirroring Cost Explorer's `GetCostAndUsage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostResponse {
    #[serde(default)]
    pub results_by_time: Vec<TimeBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeBucket {
    pub time_period: TimePeriod,
    #[serde(default)]
    pub groups: Vec<CostGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimePeriod {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostGroup {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: HashMap<String, MetricValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: Option<String>,
    pub unit: Option<String>,
}

/// The cost-query collaborator. Credentials, retries and transport are its concern.
#[async_trait]
pub trait CostSource: Send + Sync {
    async fn query(&self, query: &CostQuery) -> Result<CostResponse, BoxError>;
}
