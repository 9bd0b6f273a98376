//! crpt-api demo harness
//!
//! Demonstrates both rate limiting strategies against the configured CRPT
//! endpoint: a sequential phase where one task submits documents through a
//! [`SequentialRateLimiter`], then a concurrent phase where several workers
//! share one [`ConcurrentRateLimiter`]. Transport failures are logged and do
//! not abort the demo; the point is the request pacing.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tokio::time::Instant;
use tracing::{info, warn};

use crpt_api::{
    ConcurrentRateLimiter, Config, CreateDocumentRequest, CrptClient, DocumentDescription,
    Product, SequentialRateLimiter, init_tracing,
};

/// Demo CLI arguments
#[derive(Parser, Debug)]
#[command(name = "crpt-api")]
#[command(about = "Rate-limited CRPT document API demo")]
struct Args {
    /// Requests allowed per window (overrides config)
    #[arg(long)]
    limit: Option<u32>,

    /// Window duration in milliseconds (overrides config)
    #[arg(long)]
    period_ms: Option<u64>,

    /// Documents to submit in each phase
    #[arg(long, default_value_t = 15)]
    requests: u32,

    /// Concurrent workers in the second phase
    #[arg(long, default_value_t = 3)]
    workers: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(limit) = args.limit {
        config.rate_limit.limit = limit;
    }
    if let Some(period_ms) = args.period_ms {
        config.rate_limit.period_millis = period_ms;
    }

    init_tracing(&config.logging)?;
    info!(
        limit = config.rate_limit.limit,
        period_ms = config.rate_limit.period_millis,
        url = %config.api.documents_create_url,
        "starting CRPT demo"
    );

    let client = Arc::new(CrptClient::new(&config.api)?);
    let document = sample_document();

    run_sequential(&config, &client, &document, args.requests).await?;
    run_concurrent(&config, &client, &document, args.requests, args.workers).await?;

    Ok(())
}

/// One task, one limiter, no contention.
async fn run_sequential(
    config: &Config,
    client: &CrptClient,
    document: &CreateDocumentRequest,
    requests: u32,
) -> anyhow::Result<()> {
    info!("*** sequential phase ***");
    let mut limiter =
        SequentialRateLimiter::new(config.rate_limit.period(), config.rate_limit.limit)?;
    let started = Instant::now();
    for request in 1..=requests {
        limiter.acquire().await;
        submit(client, document, request, started).await;
    }
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "sequential phase done");
    Ok(())
}

/// Several workers racing for slots on one shared limiter.
async fn run_concurrent(
    config: &Config,
    client: &Arc<CrptClient>,
    document: &CreateDocumentRequest,
    requests: u32,
    workers: u32,
) -> anyhow::Result<()> {
    info!(workers, "*** concurrent phase ***");
    let limiter = Arc::new(ConcurrentRateLimiter::new(
        config.rate_limit.period(),
        config.rate_limit.limit,
    )?);
    let started = Instant::now();

    let mut handles = Vec::new();
    for worker in 0..workers {
        // Spread the requests across workers, remainder to the first ones.
        let share = requests / workers + u32::from(worker < requests % workers);
        let limiter = Arc::clone(&limiter);
        let client = Arc::clone(client);
        let document = document.clone();
        handles.push(tokio::spawn(async move {
            for request in 1..=share {
                limiter.acquire().await;
                submit(&client, &document, request, started).await;
            }
        }));
    }
    for handle in handles {
        handle.await?;
    }
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "concurrent phase done");
    Ok(())
}

async fn submit(
    client: &CrptClient,
    document: &CreateDocumentRequest,
    request: u32,
    started: Instant,
) {
    let at_ms = started.elapsed().as_millis() as u64;
    match client.create_document(document).await {
        Ok(status) => info!(request, at_ms, status = status.as_u16(), "document submitted"),
        Err(e) => warn!(request, at_ms, error = %e, "document submission failed"),
    }
}

/// Sample payload matching the CRPT documents-create shape.
fn sample_document() -> CreateDocumentRequest {
    CreateDocumentRequest {
        description: DocumentDescription {
            participant_inn: "0123456789".to_string(),
        },
        doc_id: "123".to_string(),
        doc_status: "new".to_string(),
        doc_type: "LP_INTRODUCE_GOODS".to_string(),
        import_request: true,
        owner_inn: "0123456789".to_string(),
        participant_inn: "0123456789".to_string(),
        producer_inn: "0123456789".to_string(),
        production_date: date(2024, 5, 10),
        production_type: "SOME_TYPE".to_string(),
        products: vec![Product {
            certificate_document: "cert".to_string(),
            certificate_document_date: date(2024, 2, 10),
            certificate_document_number: "39127".to_string(),
            owner_inn: "0123456789".to_string(),
            producer_inn: "0123456789".to_string(),
            production_date: date(2024, 5, 6),
            tnved_code: String::new(),
            uit_code: String::new(),
            uitu_code: String::new(),
        }],
        reg_date: date(2024, 4, 10),
        reg_number: "941247".to_string(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
