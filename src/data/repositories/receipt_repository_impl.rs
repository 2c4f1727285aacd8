use async_trait::async_trait;
use chrono::Utc;

use crate::{
    config::VerifyReceiptConfig,
    constants::{LOG_PREFIX, TRACING_TARGET},
    data::{
        datasources::verify_receipt_datasource::{
            ReceiptEndpoint, VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
        },
        models::verify_receipt_api::request_body_model::RequestBodyModel,
    },
    domain::{
        entities::{receipt_status::ReceiptStatus, verified_receipt::VerifiedReceipt},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapAppleError,
    logger::ReceiptLogger,
};

pub struct ReceiptRepositoryImpl<D: VerifyReceiptDatasource> {
    verify_receipt_datasource: D,
}

#[async_trait]
impl<D: VerifyReceiptDatasource> ReceiptRepository for ReceiptRepositoryImpl<D> {
    async fn verify_receipt(
        &self,
        receipt: &str,
        config: &VerifyReceiptConfig,
    ) -> Result<VerifiedReceipt, IapAppleError> {
        let body = RequestBodyModel {
            receipt_data: receipt.to_string(),
            password: config.app_shared_secret.clone(),
            exclude_old_transactions: config.exclude_old_transactions,
        };
        let logger = config.logger.as_deref();

        // Production first, as Apple recommends. A sandbox receipt sent there
        // comes back as 21007, which is the only case where sandbox is tried
        // afterwards.
        let mut verified = None;
        if !config.force_sandbox_only {
            verified = self
                .attempt(ReceiptEndpoint::Production, &body, logger)
                .await?;
            if verified.is_none() {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "sandbox receipt detected, retrying against sandbox"
                );
            }
        }
        if verified.is_none() {
            verified = self.attempt(ReceiptEndpoint::Sandbox, &body, logger).await?;
        }
        let verified = verified.ok_or(IapAppleError::Unavailable)?;

        if !verified.is_success() {
            return Err(IapAppleError::rejected(verified));
        }

        // A structurally valid receipt can represent no purchase at all (see
        // TN2413), which must not be mistaken for a successful purchase.
        let has_empty_purchase_list = verified
            .receipt
            .as_ref()
            .and_then(|r| r.in_app.as_ref())
            .is_some_and(|in_app| in_app.is_empty());
        if has_empty_purchase_list {
            return Err(IapAppleError::EmptyPurchaseList {
                data: Box::new(verified),
            });
        }

        Ok(verified)
    }
}

impl ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl> {
    pub fn new() -> Self {
        Self::with_datasource(VerifyReceiptDatasourceImpl::new())
    }
}

impl Default for ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: VerifyReceiptDatasource> ReceiptRepositoryImpl<D> {
    /// Uses a custom transport, e.g. to point at a different host.
    pub fn with_datasource(verify_receipt_datasource: D) -> Self {
        Self {
            verify_receipt_datasource,
        }
    }

    /// Performs a single callout and applies the per-endpoint status policy.
    ///
    /// Returns `Ok(None)` when the endpoint reports a sandbox receipt sent to
    /// production, so the caller can move on to the sandbox endpoint.
    async fn attempt(
        &self,
        endpoint: ReceiptEndpoint,
        body: &RequestBodyModel,
        logger: Option<&dyn ReceiptLogger>,
    ) -> Result<Option<VerifiedReceipt>, IapAppleError> {
        let url = self.verify_receipt_datasource.endpoint_url(endpoint).to_string();
        log(logger, || format!("{LOG_PREFIX} Validating against: {url} endpoint"));
        log(logger, || {
            format!("{LOG_PREFIX} Validation data: {}", body.to_log_string())
        });

        let response = match self
            .verify_receipt_datasource
            .verify_receipt(endpoint, body)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error(logger, || format!("{LOG_PREFIX} Endpoint {url} failed: {e}"));
                return Err(e);
            }
        };
        log(logger, || {
            format!(
                "{LOG_PREFIX} Endpoint {url} response: {}",
                to_log_json(&response)
            )
        });

        match response.status {
            ReceiptStatus::Success => {
                log(logger, || format!("{LOG_PREFIX} Validation successful"));
                Ok(Some(response))
            }
            ReceiptStatus::TestEnvReceiptDetected => Ok(None),
            ReceiptStatus::DataMalformed => Err(IapAppleError::rejected(response)),
            ReceiptStatus::SubscriptionExpired
                if is_still_active(&response, Utc::now().timestamp_millis()) =>
            {
                // 21006 is returned both for expired subscriptions and for
                // cancelled ones that have not reached their expiry yet.
                log(logger, || {
                    format!("{LOG_PREFIX} Valid receipt, but has been cancelled (not expired yet)")
                });
                tracing::debug!(
                    target: TRACING_TARGET,
                    "overriding status 21006 to success"
                );
                Ok(Some(VerifiedReceipt {
                    status: ReceiptStatus::Success,
                    ..response
                }))
            }
            _ => {
                error(logger, || {
                    format!(
                        "{LOG_PREFIX} Endpoint {url} failed: {}",
                        to_log_json(&response)
                    )
                });
                Err(IapAppleError::rejected(response))
            }
        }
    }
}

/// Whether the latest expiration across all transaction records is still in
/// the future.
fn is_still_active(response: &VerifiedReceipt, now_ms: i64) -> bool {
    response
        .max_expiration_ms()
        .is_some_and(|expiration_ms| expiration_ms > now_ms)
}

fn log(logger: Option<&dyn ReceiptLogger>, message: impl FnOnce() -> String) {
    if let Some(logger) = logger {
        logger.log(&message());
    }
}

fn error(logger: Option<&dyn ReceiptLogger>, message: impl FnOnce() -> String) {
    if let Some(logger) = logger {
        logger.error(&message());
    }
}

fn to_log_json(response: &VerifiedReceipt) -> String {
    serde_json::to_string_pretty(response).unwrap_or_default()
}
