use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use rwfs_guard::GuardedStore;
use rwfs_store::InMemoryStore;
use rwfs_workload::{RunReport, WorkloadDriver};
use tracing::{info, warn};

use crate::cli::*;
use crate::config::AppConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    match cli.command.unwrap_or(Command::Run(Overrides::default())) {
        Command::Run(overrides) => {
            config.apply(&overrides);
            config.validate()?;
            cmd_run(config, cli.format).await
        }
        Command::Config(overrides) => {
            config.apply(&overrides);
            config.validate()?;
            cmd_config(&config, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn cmd_run(config: AppConfig, format: OutputFormat) -> anyhow::Result<ExitCode> {
    info!("starting file server simulation");
    let store = Arc::new(InMemoryStore::new());
    let (guard, interrupt) =
        GuardedStore::from_config(store, &config.guard).context("building guarded store")?;
    let mut driver = WorkloadDriver::new(guard, config.workload).context("building workload driver")?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; aborting in-flight operations");
            interrupt.interrupt();
        }
    });

    let report = driver.run().await.context("simulation failed")?;
    match format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    info!("done");

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_config(config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

fn render_text(report: &RunReport) -> String {
    let u = &report.users;
    let mut out = String::new();
    let status = if report.is_clean() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    out.push_str(&format!(
        "{} Run {} finished in {} ms\n",
        status,
        report.run_id.to_string().cyan(),
        report.elapsed_ms
    ));
    out.push_str(&format!("  Seeded: {} records\n", report.seeded));
    out.push_str(&format!(
        "  Users: {} ({} reads, {} hits; {} writes, {} hits)\n",
        u.users, u.reads, u.read_hits, u.writes, u.write_hits
    ));
    if u.failures > 0 {
        out.push_str(&format!("  Failures: {}\n", u.failures.to_string().red()));
    }
    for name in &report.missing {
        out.push_str(&format!("  {} {}\n", "missing:".red(), name));
    }
    for record in &report.records {
        out.push_str(&format!("  {} = {:?}\n", record.name().yellow(), record.content()));
    }
    out
}
