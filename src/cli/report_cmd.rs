use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::Settings;
use crate::core::error::CostError;
use crate::core::models::cost::Report;
use crate::core::notify::{Notifier, SlackNotifier};
use crate::core::report::ReportBuilder;
use crate::core::source::aws::CostExplorerSource;
use crate::core::source::CostSource;

/// Deadline for the whole Cost Explorer interaction.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

async fn fetch_report<S: CostSource>(source: S, days: i64) -> Result<Report> {
    let report = ReportBuilder::new(source)
        .build_report(days, Utc::now().date_naive())
        .await?;
    info!(periods = report.len(), "Cost report built");
    Ok(report)
}

async fn fetch_from_aws(days: i64) -> Result<Report> {
    let source = CostExplorerSource::from_env()
        .await
        .context("Failed to create cost tracker")?;
    fetch_report(source, days).await
}

/// Run `fetch` under `deadline`; expiry is reported as a Cost Explorer failure.
async fn fetch_with_deadline<F>(fetch: F, deadline: Duration) -> Result<Report>
where
    F: Future<Output = Result<Report>>,
{
    match tokio::time::timeout(deadline, fetch).await {
        Ok(result) => result,
        Err(_) => Err(CostError::Collaborator(
            format!("request timed out after {}s", deadline.as_secs_f64()).into(),
        )
        .into()),
    }
}

fn format_report(report: &Report, days: i64, opts: &OutputOptions) -> Result<String> {
    match opts.format {
        OutputFormat::Text => Ok(renderer::render_report(report, days, opts.use_color)),
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            Ok(format!("{}\n", json))
        }
    }
}

/// Print the report on success, then notify. Failures are reported to the
/// notifier before being returned.
async fn finish(
    outcome: Result<Report>,
    days: i64,
    opts: &OutputOptions,
    notifier: &dyn Notifier,
) -> Result<()> {
    let outcome = outcome.and_then(|report| format_report(&report, days, opts));
    match outcome {
        Ok(text) => {
            print!("{}", text);
            notifier.notify(&renderer::summarize(days)).await;
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Error getting costs");
            notifier.notify(&renderer::summarize_failure(days, &e)).await;
            Err(e)
        }
    }
}

pub async fn run(settings: &Settings, opts: &OutputOptions) -> Result<()> {
    let days = settings.days;
    info!(days, "Fetching AWS costs");

    let notifier = SlackNotifier::new(settings.slack_webhook_url.clone());

    let outcome = fetch_with_deadline(fetch_from_aws(days), QUERY_TIMEOUT).await;

    finish(outcome, days, opts, &notifier).await
}

async fn report_setup_failure(notifier: &dyn Notifier, err: anyhow::Error) -> anyhow::Error {
    error!(error = %format!("{:#}", err), "Failed to load configuration");
    notifier.notify(&renderer::summarize_setup_failure(&err)).await;
    err
}

/// Best-effort notification for failures that happen before settings are
/// resolved. Returns the error for the caller to propagate.
pub async fn abort_setup(webhook_url: Option<String>, err: anyhow::Error) -> anyhow::Error {
    let notifier = SlackNotifier::new(webhook_url);
    report_setup_failure(&notifier, err).await
}
