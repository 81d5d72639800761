#[macro_use]
extern crate lazy_static;

use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use resources::config::AutoscalerConfig;
use serde::Deserialize;
use serde_json::Value;

mod classifier;
mod config;
mod evaluate;
mod facade;
mod gather;
mod measurement;
mod metrics_client;
mod pod_lister;
mod ratio;
mod scale_target;

use measurement::{Evaluation, GatheredMetric};
use metrics_client::HttpMetricsClient;
use pod_lister::HttpPodLister;

lazy_static! {
    static ref CONFIG: AutoscalerConfig = config::load().expect("failed to load configuration");
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long)]
    mode: String,
}

#[derive(Debug, Deserialize)]
struct MetricModeInput {
    resource: Value,
}

#[derive(Debug, Deserialize)]
struct EvaluateModeInput {
    metrics: Vec<EmbeddedMetric>,
    resource: Value,
}

#[derive(Debug, Deserialize)]
struct EmbeddedMetric {
    value: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Mode is validated before any I/O: an unknown mode must fail without
    // touching stdin.
    match cli.mode.as_str() {
        "metric" => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
            run_metric_mode(&input)
        }
        "evaluate" => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
            run_evaluate_mode(&input)
        }
        other => Err(anyhow!("Unknown command mode: {other}")),
    }
}

fn run_metric_mode(input: &str) -> Result<()> {
    let specs = config::load_metric_specs()?;
    let parsed: MetricModeInput = serde_json::from_str(input).context("malformed stdin for metric mode")?;
    let target = scale_target::resolve(&parsed.resource)?;

    let client = HttpMetricsClient::new(CONFIG.metrics_api_url.clone());
    let lister = HttpPodLister::new(CONFIG.metrics_api_url.clone());
    let now = Utc::now().naive_utc();

    let gathered = gather::gather_all(&specs, &target, &client, &lister, &CONFIG, now)?;
    println!("{}", serde_json::to_string(&gathered)?);
    Ok(())
}

fn run_evaluate_mode(input: &str) -> Result<()> {
    let parsed: EvaluateModeInput = serde_json::from_str(input).context("malformed stdin for evaluate mode")?;
    let target = scale_target::resolve(&parsed.resource)?;

    let mut metrics: Vec<GatheredMetric> = Vec::new();
    for wrapper in &parsed.metrics {
        let batch: Vec<GatheredMetric> =
            serde_json::from_str(&wrapper.value).context("malformed embedded gathered metric")?;
        metrics.extend(batch);
    }

    let now = Utc::now().naive_utc();
    let target_replicas = evaluate::evaluate_all(&metrics, target.replicas, &CONFIG, now)?;
    println!("{}", serde_json::to_string(&Evaluation { target_replicas })?);
    Ok(())
}
