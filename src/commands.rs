//! Command-line surface: plays the browser's part against a live backend.

use crate::banner::{show_loading_message, LoadingBanner};
use crate::config::UiConfig;
use crate::dispatcher::{PendingPrediction, PredictDispatcher, PredictionOutcome, RowSnapshot};
use crate::error::UiError;
use crate::page::Page;
use crate::transport::{HttpBackend, IndexQuery, PredictClient};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

#[derive(Parser, Debug)]
#[command(name = "churn-ui")]
#[command(about = "Drive the churn console's predict buttons from the terminal", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "churn-ui.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the prediction service is up
    Status,
    /// Request one prediction directly
    Predict {
        #[arg(long)]
        customer_id: String,
    },
    /// Load the console page, click its predict buttons and print the results
    Page {
        /// Read the rendered page from a file instead of the backend
        #[arg(long)]
        file: Option<PathBuf>,
        /// Customer id filter passed to the index view
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "10")]
        size: u32,
        /// Rows to click; all rows when omitted
        #[arg(long = "row")]
        rows: Vec<String>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the CSV prediction report
    Report {
        #[arg(long, default_value = "predict_report.csv")]
        out: PathBuf,
    },
}

/* ---------- 1.  SETUP ---------- */

pub fn load_config(cli: &Cli) -> Result<UiConfig> {
    let config = UiConfig::load_or_default(&cli.config)?.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/* ---------- 2.  COMMANDS ---------- */

pub async fn status(backend: &HttpBackend) -> Result<()> {
    let text = backend
        .status()
        .await
        .context("prediction service unreachable")?;
    println!("{}", text);
    Ok(())
}

pub async fn predict(backend: &HttpBackend, config: &UiConfig, customer_id: &str) -> Result<()> {
    let outcome = predict_outcome(backend, customer_id).await;
    println!("{}", outcome.display_text(&config.dom.error_text));
    Ok(())
}

async fn predict_outcome(backend: &HttpBackend, customer_id: &str) -> PredictionOutcome {
    async { PredictionOutcome::from_result(backend.predict(customer_id).await) }
        .instrument(info_span!("predict", customer_id))
        .await
}

pub struct PageArgs {
    pub file: Option<PathBuf>,
    pub query: IndexQuery,
    pub rows: Vec<String>,
    pub json: bool,
}

pub async fn page(backend: HttpBackend, config: &UiConfig, args: PageArgs) -> Result<()> {
    let html = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => backend
            .index_page(&args.query)
            .await
            .context("fetching console page")?,
    };

    // Page ready: bind triggers, expose the banner.
    let page = Page::from_html(&html, &config.dom)?;
    let banner = LoadingBanner::new(page.banner().cloned(), &config.banner);
    if !banner.install() {
        warn!("Loading banner already installed");
    }
    let client: Arc<dyn PredictClient> = Arc::new(backend);
    let dispatcher = PredictDispatcher::bind(&page, client, &config.dom);

    show_loading_message();
    let pending = click_rows(&dispatcher, &args.rows)?;
    info!(requests = pending.len(), "Waiting for predictions");
    for outcome in join_all(pending.into_iter().map(PendingPrediction::wait)).await {
        outcome?;
    }

    print_rows(&dispatcher.snapshot(), args.json)?;
    for skipped in dispatcher.skipped() {
        eprintln!(
            "skipped trigger #{} (row {}): {}",
            skipped.index,
            skipped.row_id.as_deref().unwrap_or("?"),
            skipped.reason
        );
    }
    Ok(())
}

fn click_rows(dispatcher: &PredictDispatcher, rows: &[String]) -> Result<Vec<PendingPrediction>> {
    if rows.is_empty() {
        return Ok(dispatcher.click_all());
    }
    // Reject the whole batch before anything is clicked.
    if let Some(unknown) = rows.iter().find(|row| !dispatcher.is_bound(row)) {
        return Err(UiError::UnknownRow(unknown.clone()).into());
    }
    rows.iter()
        .map(|row| dispatcher.click(row).map_err(anyhow::Error::from))
        .collect()
}

fn print_rows(rows: &[RowSnapshot], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    for row in rows {
        println!("{:>6}  {:<12}  {}", row.row_id, row.customer_id, row.text);
    }
    Ok(())
}

pub async fn report(backend: &HttpBackend, out: &Path) -> Result<()> {
    let bytes = backend.download_report(out).await?;
    println!("Saved {} bytes to {}", bytes, out.display());
    Ok(())
}

/* ---------- 3.  ENTRY ---------- */

pub async fn run(cli: Cli, config: UiConfig) -> Result<()> {
    let backend = HttpBackend::new(&config.backend)?;

    match cli.command {
        Commands::Status => status(&backend).await,
        Commands::Predict { customer_id } => predict(&backend, &config, &customer_id).await,
        Commands::Page {
            file,
            search,
            page: page_no,
            size,
            rows,
            json,
        } => {
            let args = PageArgs {
                file,
                query: IndexQuery {
                    search,
                    page: page_no,
                    size,
                },
                rows,
                json,
            };
            page(backend, &config, args).await
        }
        Commands::Report { out } => report(&backend, &out).await,
    }
}
