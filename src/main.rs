mod cli;
mod core;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use crate::core::config::{webhook_fallback, AppConfig, LogFormat, Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "cost-tracker",
    about = "Report AWS costs by service and post a summary to Slack",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: $XDG_CONFIG_HOME/cost-tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Slack incoming webhook URL for the run summary
    #[arg(long, global = true)]
    slack_webhook_url: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch costs grouped by service and print them
    Report(ReportArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Default)]
struct ReportArgs {
    /// Number of days to look back
    #[arg(short, long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Shorthand for JSON output
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the resolved settings
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn setup_webhook(flag: Option<String>, file: Option<&AppConfig>) -> Option<String> {
    webhook_fallback(flag, |name| std::env::var(name).ok(), file)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);

    match cli.command {
        Some(Commands::Config {
            action: ConfigAction::Init,
        }) => return cli::config_cmd::init(&config_path),
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => return cli::config_cmd::check(&config_path),
        _ => {}
    }

    let show_only = matches!(
        cli.command,
        Some(Commands::Config {
            action: ConfigAction::Show
        })
    );

    let file = match AppConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))
    {
        Ok(file) => file,
        Err(e) if show_only => return Err(e),
        Err(e) => {
            let webhook = setup_webhook(cli.slack_webhook_url.clone(), None);
            return Err(cli::report_cmd::abort_setup(webhook, e).await);
        }
    };

    let report_args = match cli.command {
        Some(Commands::Report(args)) => args,
        _ => ReportArgs::default(),
    };
    let overrides = Overrides {
        days: report_args.days,
        slack_webhook_url: cli.slack_webhook_url,
        log_format: cli.log_format.map(LogFormat::from),
    };
    let settings = match Settings::from_env(&overrides, &file).context("Failed to resolve settings")
    {
        Ok(settings) => settings,
        Err(e) if show_only => return Err(e),
        Err(e) => {
            let webhook = setup_webhook(overrides.slack_webhook_url.clone(), Some(&file));
            return Err(cli::report_cmd::abort_setup(webhook, e).await);
        }
    };

    if show_only {
        cli::config_cmd::show(&settings);
        return Ok(());
    }

    core::logging::init(cli.verbose, settings.log_format);

    let output_opts = cli::output::OutputOptions {
        format: if report_args.json {
            cli::output::OutputFormat::Json
        } else {
            cli::output::OutputFormat::Text
        },
        pretty: report_args.pretty,
        use_color: cli::output::detect_color(!report_args.no_color),
    };

    cli::report_cmd::run(&settings, &output_opts).await
}
