//! CRPT (Chestny ZNAK) document API client implementation

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::errors::ApiError;
use crate::config::CrptApiConfig;

/// Document creation request body
///
/// Field names follow the CRPT wire format: snake_case throughout, with two
/// legacy camelCase exceptions handled by serde renames. Dates serialize as
/// ISO `yyyy-mm-dd`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub description: DocumentDescription,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub production_type: String,
    pub products: Vec<Product>,
    pub reg_date: NaiveDate,
    pub reg_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDescription {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: String,
    pub certificate_document_date: NaiveDate,
    pub certificate_document_number: String,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub tnved_code: String,
    pub uit_code: String,
    pub uitu_code: String,
}

/// Client for the CRPT document API
///
/// Pure transport: performs no throttling of its own. Callers gate each
/// `create_document` call with a rate limiter of their choosing.
pub struct CrptClient {
    client: Client,
    documents_create_url: String,
}

impl CrptClient {
    /// Create a client from endpoint configuration.
    pub fn new(config: &CrptApiConfig) -> Result<Self, ApiError> {
        reqwest::Url::parse(&config.documents_create_url).map_err(|_| {
            ApiError::InvalidEndpoint {
                url: config.documents_create_url.clone(),
            }
        })?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            documents_create_url: config.documents_create_url.clone(),
        })
    }

    /// Submit a document creation request.
    ///
    /// Returns the response status on success; non-2xx responses and transport
    /// failures are surfaced as [`ApiError`]. Failures here are entirely the
    /// caller's concern and never affect rate limiter state.
    pub async fn create_document(
        &self,
        document: &CreateDocumentRequest,
    ) -> Result<StatusCode, ApiError> {
        debug!(url = %self.documents_create_url, "executing request to CRPT API");
        let response = self
            .client
            .post(&self.documents_create_url)
            .json(document)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status.as_u16(), "CRPT API responded");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(status)
    }

    /// Configured documents-create endpoint.
    pub fn documents_create_url(&self) -> &str {
        &self.documents_create_url
    }
}
