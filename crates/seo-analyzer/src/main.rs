use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use seo_analyzer::{AuditConfig, Auditor};
use tracing_subscriber::EnvFilter;

/// Audit the on-page SEO health of a single URL and print the report as JSON.
#[derive(Parser, Debug)]
#[command(name = "seo-analyzer", version)]
struct Args {
    /// Page to audit, including http:// or https://
    url: String,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many unique links to probe
    #[arg(long)]
    max_links: Option<usize>,

    /// Probes in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-probe timeout in seconds
    #[arg(long)]
    probe_timeout: Option<u64>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn audit_config(&self) -> Result<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => AuditConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AuditConfig::default(),
        };
        if let Some(max_links) = self.max_links {
            config.max_links_to_check = max_links;
        }
        if let Some(concurrency) = self.concurrency {
            config.probe_concurrency = concurrency;
        }
        if let Some(probe_timeout) = self.probe_timeout {
            config.probe_timeout_secs = probe_timeout;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.audit_config()?;
    let auditor = Auditor::new(&config).context("invalid audit configuration")?;

    let report = auditor
        .audit(args.url.as_str())
        .await
        .with_context(|| format!("auditing {}", args.url))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
