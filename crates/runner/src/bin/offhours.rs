//! offhours — tag-driven EC2 start/stop scheduler.
//!
//! One invocation is one tick: list the fleet, decide per instance from its
//! tags and the current time, issue start/stop calls, and exit. Meant to be
//! triggered on a fixed 15-minute schedule by the hosting environment; a
//! non-zero exit is the failure signal the scheduler watches for.

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use offhours_ec2::{Ec2Client, Ec2Config};
use offhours_engine::{Engine, EngineConfig};
use offhours_notify::{Dispatcher, ErrorPayload, Notifier, SnsNotifier, WebhookNotifier};
use offhours_runner::{RunnerConfig, TickDriver, TickSummary};

const SOURCE: &str = "offhours";

/// Tag-driven EC2 start/stop scheduler; runs one tick and exits.
#[derive(Parser, Debug)]
#[command(name = "offhours", version, about)]
struct Cli {
    /// IANA timezone the tag schedule is interpreted in.
    #[arg(long, env = "OFFHOURS_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// SNS topic ARN for fatal-error notifications.
    #[arg(long, env = "OFFHOURS_SNS_TOPIC_ARN")]
    sns_topic_arn: Option<String>,

    /// Webhook URL for fatal-error notifications.
    #[arg(long, env = "OFFHOURS_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Stop evaluating the legacy scheduled/auto_on/auto_off tag family.
    #[arg(long, env = "OFFHOURS_NO_LEGACY_TAGS")]
    no_legacy_tags: bool,

    /// Maximum concurrent start/stop calls.
    #[arg(long, env = "OFFHOURS_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Verbose logging (same as RUST_LOG=debug).
    #[arg(long, env = "OFFHOURS_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let dispatcher = build_dispatcher(&cli).await;

    if let Err(err) = run(&cli).await {
        error!(error = %err, "fatal error during tick");
        // Best-effort page before failing the invocation; the non-zero exit
        // is what the hosting scheduler alerts on.
        dispatcher
            .dispatch(&ErrorPayload::error(SOURCE, format!("{err:#}")))
            .await;
        return Err(err);
    }

    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = RunnerConfig {
        timezone: cli.timezone.clone(),
        legacy_tags: !cli.no_legacy_tags,
        concurrency: cli.concurrency,
    };
    let tz = config.tz()?;

    let client = Arc::new(Ec2Client::new(Ec2Config::from_env()).await);
    let engine = Engine::new(EngineConfig {
        legacy_tags: config.legacy_tags,
    });
    let driver = TickDriver::new(engine, client.clone(), client, config.concurrency);

    let summary: TickSummary = driver.run_tick(Utc::now().with_timezone(&tz)).await?;
    info!(
        instances = summary.instances,
        started = summary.started,
        stopped = summary.stopped,
        "tick complete"
    );

    Ok(())
}

/// Build the notification fan-out from whatever channels are configured.
/// A channel that fails to initialise is logged and skipped; notification
/// is best-effort by design.
async fn build_dispatcher(cli: &Cli) -> Dispatcher {
    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

    if let Some(arn) = &cli.sns_topic_arn {
        let region = Ec2Config::from_env().region;
        match SnsNotifier::new(region, arn.clone()).await {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => error!(error = %e, "failed to initialise SNS notifier"),
        }
    }

    if let Some(url) = &cli.webhook_url {
        match WebhookNotifier::new(url.clone()) {
            Ok(notifier) => channels.push(Box::new(notifier)),
            Err(e) => error!(error = %e, "failed to initialise webhook notifier"),
        }
    }

    Dispatcher::new(channels)
}
