use std::path::Path;

use anyhow::{Context, Result};

use crate::core::config::{AppConfig, LogFormat, Settings};

pub fn init(path: &Path) -> Result<()> {
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    AppConfig::template()
        .save_to(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    println!("Generated config at {}", path.display());
    println!("  Set notify.slack_webhook_url to enable Slack summaries.");
    Ok(())
}

pub fn check(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No config file at {} (built-in defaults apply)", path.display());
        return Ok(());
    }

    let config = AppConfig::load_from(path)?;
    let issues = config.validate();
    if issues.is_empty() {
        println!("Config OK: {}", path.display());
        return Ok(());
    }

    for issue in &issues {
        eprintln!("  {}", issue);
    }
    anyhow::bail!(
        "{} issue{} found in {}",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" },
        path.display()
    )
}

/// Reduce a webhook URL to scheme and host; the path is the secret.
fn redact_webhook(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or_default();
            format!("{}://{}/***", scheme, host)
        }
        None => "***".to_string(),
    }
}

pub fn show(settings: &Settings) {
    let webhook = settings
        .slack_webhook_url
        .as_deref()
        .map(redact_webhook)
        .unwrap_or_else(|| "(not set)".to_string());
    let log_format = match settings.log_format {
        LogFormat::Text => "text",
        LogFormat::Json => "json",
    };
    println!("days              {}", settings.days);
    println!("slack_webhook_url {}", webhook);
    println!("log_format        {}", log_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_host_only() {
        assert_eq!(
            redact_webhook("https://hooks.slack.com/services/T000/B000/XXXX"),
            "https://hooks.slack.com/***"
        );
    }

    #[test]
    fn redact_without_scheme() {
        assert_eq!(redact_webhook("hooks.slack.com/services/T000"), "***");
    }

    #[test]
    fn init_writes_template_once() {
        let dir = std::env::temp_dir().join(format!("cost-tracker-init-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_dir_all(&dir);

        init(&path).unwrap();
        let written = AppConfig::load_from(&path).unwrap();
        assert_eq!(written, AppConfig::template());

        std::fs::write(&path, "[report]\ndays = 9\n").unwrap();
        init(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().report.days, Some(9));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn check_fails_on_invalid_file() {
        let dir = std::env::temp_dir().join(format!("cost-tracker-check-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[report]\ndays = 0\n").unwrap();

        let err = check(&path).unwrap_err();
        assert!(err.to_string().contains("1 issue found"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
