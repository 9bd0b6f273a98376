//! crpt-api - Rate-limited client for the CRPT (Chestny ZNAK) document API
//!
//! The core of the crate is a fixed-window rate limiter with two strategies
//! sharing one contract, plus a thin HTTP client for the documents-create
//! endpoint:
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use crpt_api::ConcurrentRateLimiter;
//!
//! let limiter = ConcurrentRateLimiter::new(Duration::from_secs(1), 4)?;
//! limiter.acquire().await;
//! client.create_document(&document).await?;
//! ```
//!
//! Configuration loads from `config/` files and `CRPT__`-prefixed environment
//! variables:
//!
//! ```bash
//! CRPT__RATE_LIMIT__LIMIT=4
//! CRPT__API__DOCUMENTS_CREATE_URL=https://ismp.crpt.ru/api/v3/lk/documents/create
//! ```

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod logging;

pub use application::errors::ApiError;
pub use config::Config;
pub use infrastructure::api_clients::crpt::{
    CreateDocumentRequest, CrptClient, DocumentDescription, Product,
};
pub use infrastructure::rate_limiter::{
    AcquireError, ConcurrentRateLimiter, SequentialRateLimiter,
};
pub use logging::init_tracing;
