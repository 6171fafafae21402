use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_costexplorer::config::ProvideCredentials;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType, ResultByTime,
};
use tracing::debug;

use crate::core::error::{BoxError, CostError};
use crate::core::source::{
    CostGroup, CostQuery, CostResponse, CostSource, MetricValue, TimeBucket, TimePeriod,
};

/// Cost Explorer is served from us-east-1 regardless of where resources run.
const FALLBACK_REGION: &str = "us-east-1";

/// AWS Cost Explorer client, authenticated through the default credential chain
/// (environment, shared profile, web identity).
pub struct CostExplorerSource {
    client: aws_sdk_costexplorer::Client,
}

impl CostExplorerSource {
    pub async fn from_env() -> Result<Self, CostError> {
        let region = RegionProviderChain::default_provider().or_else(FALLBACK_REGION);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        resolve_credentials(&config).await?;
        debug!(region = ?config.region(), "AWS SDK config loaded");

        Ok(Self {
            client: aws_sdk_costexplorer::Client::new(&config),
        })
    }
}

/// Resolve credentials once up front so a missing identity fails the run
/// as a configuration problem rather than at the first API call.
async fn resolve_credentials(config: &SdkConfig) -> Result<(), CostError> {
    let provider = config.credentials_provider().ok_or_else(|| {
        CostError::Configuration("no AWS credentials provider configured".to_string())
    })?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| CostError::Configuration(format!("no resolvable AWS credentials: {}", e)))?;
    Ok(())
}

fn convert_bucket(result: &ResultByTime) -> TimeBucket {
    let time_period = result
        .time_period()
        .map(|p| TimePeriod {
            start: p.start().to_string(),
            end: p.end().to_string(),
        })
        .unwrap_or_default();

    let groups = result
        .groups()
        .iter()
        .map(|g| CostGroup {
            keys: g.keys().to_vec(),
            metrics: g
                .metrics()
                .map(|m| {
                    m.iter()
                        .map(|(name, value)| {
                            (
                                name.clone(),
                                MetricValue {
                                    amount: value.amount().map(str::to_string),
                                    unit: value.unit().map(str::to_string),
                                },
                            )
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    TimeBucket {
        time_period,
        groups,
    }
}

#[async_trait]
impl CostSource for CostExplorerSource {
    async fn query(&self, query: &CostQuery) -> Result<CostResponse, BoxError> {
        let period = DateInterval::builder()
            .start(query.start_str())
            .end(query.end_str())
            .build()?;
        let group = GroupDefinition::builder()
            .r#type(GroupDefinitionType::Dimension)
            .key(query.group_by.clone())
            .build();

        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(period)
            .granularity(Granularity::Monthly)
            .group_by(group);
        for metric in &query.metrics {
            request = request.metrics(metric.clone());
        }

        debug!(start = %query.start_str(), end = %query.end_str(), "Calling GetCostAndUsage");
        let output = request.send().await?;

        Ok(CostResponse {
            results_by_time: output.results_by_time().iter().map(convert_bucket).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_costexplorer::types::{Group, MetricValue as SdkMetricValue};

    #[test]
    fn convert_bucket_copies_fields_verbatim() {
        let result = ResultByTime::builder()
            .time_period(
                DateInterval::builder()
                    .start("2024-01-01")
                    .end("2024-02-01")
                    .build()
                    .unwrap(),
            )
            .groups(
                Group::builder()
                    .keys("Amazon Elastic Compute Cloud - Compute")
                    .metrics(
                        "BlendedCost",
                        SdkMetricValue::builder().amount("12.5000001").unit("USD").build(),
                    )
                    .build(),
            )
            .build();

        let bucket = convert_bucket(&result);
        assert_eq!(bucket.time_period.start, "2024-01-01");
        assert_eq!(bucket.time_period.end, "2024-02-01");
        assert_eq!(bucket.groups[0].keys, vec!["Amazon Elastic Compute Cloud - Compute"]);
        let metric = &bucket.groups[0].metrics["BlendedCost"];
        assert_eq!(metric.amount.as_deref(), Some("12.5000001"));
        assert_eq!(metric.unit.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn missing_credentials_is_configuration_error() {
        let missing = std::env::temp_dir().join("cost-tracker-no-such-aws-file");
        std::env::set_var("AWS_CONFIG_FILE", &missing);
        std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", &missing);
        std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
        for name in [
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "AWS_SESSION_TOKEN",
            "AWS_PROFILE",
            "AWS_WEB_IDENTITY_TOKEN_FILE",
            "AWS_ROLE_ARN",
            "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI",
            "AWS_CONTAINER_CREDENTIALS_FULL_URI",
        ] {
            std::env::remove_var(name);
        }

        let result = CostExplorerSource::from_env().await;
        assert!(matches!(result, Err(CostError::Configuration(_))));
    }

    #[test]
    fn convert_bucket_without_groups() {
        let result = ResultByTime::builder().build();
        let bucket = convert_bucket(&result);
        assert!(bucket.groups.is_empty());
        assert_eq!(bucket.time_period, TimePeriod::default());
    }
}
