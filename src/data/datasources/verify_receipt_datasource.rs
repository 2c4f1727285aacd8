use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::{
    constants::{PRODUCTION_VERIFY_RECEIPT_URL, SANDBOX_VERIFY_RECEIPT_URL},
    data::models::verify_receipt_api::request_body_model::RequestBodyModel,
    domain::entities::verified_receipt::VerifiedReceipt,
    errors::IapAppleError,
};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptEndpoint {
    Production,
    Sandbox,
}

/// Transport for the legacy verifyReceipt endpoint:
/// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
///
/// Implementations only move bytes. Status codes inside the response body
/// are interpreted by the caller; any failure to obtain an HTTP 200 with a
/// decodable body is an [`IapAppleError::Transport`].
#[async_trait]
pub trait VerifyReceiptDatasource: Send + Sync {
    async fn verify_receipt(
        &self,
        endpoint: ReceiptEndpoint,
        body: &RequestBodyModel,
    ) -> Result<VerifiedReceipt, IapAppleError>;

    /// URL used for the given endpoint, for log lines.
    fn endpoint_url(&self, endpoint: ReceiptEndpoint) -> &str;
}

pub struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
    production_url: String,
    sandbox_url: String,
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify_receipt(
        &self,
        endpoint: ReceiptEndpoint,
        body: &RequestBodyModel,
    ) -> Result<VerifiedReceipt, IapAppleError> {
        self.callout(self.endpoint_url(endpoint), body).await
    }

    fn endpoint_url(&self, endpoint: ReceiptEndpoint) -> &str {
        match endpoint {
            ReceiptEndpoint::Production => &self.production_url,
            ReceiptEndpoint::Sandbox => &self.sandbox_url,
        }
    }
}

impl VerifyReceiptDatasourceImpl {
    pub fn new() -> Self {
        Self::with_endpoints(PRODUCTION_VERIFY_RECEIPT_URL, SANDBOX_VERIFY_RECEIPT_URL)
    }

    pub fn with_endpoints(
        production_url: impl Into<String>,
        sandbox_url: impl Into<String>,
    ) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            production_url: production_url.into(),
            sandbox_url: sandbox_url.into(),
        }
    }

    async fn callout(
        &self,
        url: &str,
        body: &RequestBodyModel,
    ) -> Result<VerifiedReceipt, IapAppleError> {
        let transport_error = |message: String| IapAppleError::Transport {
            endpoint: url.to_string(),
            message,
        };

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(format!("Callout failed to send: {}", e)))?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status();
            return Err(transport_error(format!(
                "Callout returned with non-200 status code: {}; {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| transport_error(format!("Failed to parse callout response: {}", e)))
    }
}

impl Default for VerifyReceiptDatasourceImpl {
    fn default() -> Self {
        Self::new()
    }
}
