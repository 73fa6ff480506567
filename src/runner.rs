use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, DelayUnit};
use webfuzz::compose::{BaseTarget, Composer};
use webfuzz::config::{Mode, RunConfig};
use webfuzz::filter::Classifier;
use webfuzz::http_client::{create_probe_client, ClientSettings};
use webfuzz::lifecycle::{Lifecycle, ShutdownPolicy};
use webfuzz::output::{ReportSink, Reporter};
use webfuzz::probe::HttpProber;
use webfuzz::scheduler::{RunSummary, Scheduler};
use webfuzz::wordlist::Wordlist;

const INFO: &str = "\x1b[1;96m[+]\x1b[0m";

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Keep reqwest/hyper at INFO so --debug stays readable.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!("webfuzz={level},reqwest=info,hyper=info", level = crate_level);
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();

    let config = config_from_cli(&cli);
    let base = config.validate().context("invalid configuration")?;

    // The deadline clock starts here, before the wordlist is touched.
    let lifecycle = Lifecycle::new(config.deadline, config.shutdown);
    let watcher = lifecycle.spawn();

    print_banner(&config);
    tracing::info!(url = %config.target, threads = config.concurrency, mode = ?config.mode, "starting run");

    let outcome = run_scan(&config, base, lifecycle.token()).await;
    watcher.abort();
    let (summary, report_path) = outcome?;

    println!("\nTotal found: {}", summary.total_found);
    if let Some(path) = report_path {
        println!("{} Report saved to: {}", info_marker(config.color), path.display());
    }
    Ok(())
}

fn config_from_cli(cli: &Cli) -> RunConfig {
    let delay = match cli.delay_unit {
        DelayUnit::Ms => Duration::from_millis(cli.delay),
        DelayUnit::S => Duration::from_secs(cli.delay),
    };
    let extensions = if cli.extension.is_empty() {
        None
    } else {
        Some(
            cli.extension
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_string())
                .collect::<BTreeSet<_>>(),
        )
    };
    RunConfig {
        target: cli.target.clone(),
        wordlist: cli.wordlist.clone(),
        concurrency: cli.threads as usize,
        delay,
        deadline: (cli.max_time > 0).then(|| Duration::from_secs(cli.max_time)),
        mode: if cli.sub { Mode::SubdomainSubstitute } else { Mode::AppendPath },
        extensions,
        excluded_status: cli.exclude_status.iter().copied().collect(),
        exclude_length: (cli.exclude_length > 0).then_some(cli.exclude_length),
        output: cli.output.clone(),
        format: cli.format,
        method: cli.method,
        follow_redirects: cli.follow_redirects,
        timeout: Duration::from_secs(cli.timeout),
        shutdown: if cli.graceful { ShutdownPolicy::Drain } else { ShutdownPolicy::Abort },
        color: !cli.no_color,
    }
}

fn info_marker(color: bool) -> &'static str {
    if color { INFO } else { "[+]" }
}

fn print_banner(config: &RunConfig) {
    let info = info_marker(config.color);
    println!("{} Delay: {:?}", info, config.delay);
    match config.deadline {
        Some(d) => println!("{} Max run time: {}s", info, d.as_secs()),
        None => println!("{} Max run time: none", info),
    }
    println!("{} Exclude length: {}", info, config.exclude_length.unwrap_or(0));
    println!("{} Threads: {}", info, config.concurrency);
    println!("{} Wordlist: {}", info, config.wordlist.display());
    println!("{} Mode: {:?} ({:?})", info, config.mode, config.method);
    println!("{} Url Target: {}\n", info, config.target);
}

async fn run_scan(
    config: &RunConfig,
    base: BaseTarget,
    cancel: CancellationToken,
) -> anyhow::Result<(RunSummary, Option<PathBuf>)> {
    let wordlist = Wordlist::open(&config.wordlist).await?;

    let sink = match &config.output {
        Some(path) => Some(ReportSink::open(path, config.format)?),
        None => None,
    };
    let reporter = Reporter::new(config.color, sink);
    let report_path = reporter.report_path().map(|p| p.to_path_buf());

    let policy = Arc::new(config.status_policy());
    let client = create_probe_client(&ClientSettings::from(config))?;
    let prober = HttpProber::new(client, config.method.as_reqwest(), policy.clone());
    let classifier = Classifier::new(policy, config.exclude_length);
    let composer = Composer::new(base, config.mode, config.extension_filter());

    let scheduler = Scheduler::new(composer, prober, classifier, Arc::new(reporter), config.concurrency)
        .with_delay(config.delay)
        .with_cancellation(cancel);
    let summary = scheduler.run(wordlist).await?;
    Ok((summary, report_path))
}
