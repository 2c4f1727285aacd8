use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::errors::IapAppleError;

/// Normalized view of one purchase lineage, built from the most recent
/// transaction record sharing its original transaction ID.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedItem {
    pub bundle_id: String,
    pub app_item_id: Option<String>,
    pub transaction_id: String,
    /// In the case of subscriptions, stays the same across renewals.
    pub original_transaction_id: String,
    pub product_id: String,
    #[serde(rename = "purchaseDateMS")]
    pub purchase_date_ms: i64,
    #[serde(rename = "originalPurchaseDateMS")]
    pub original_purchase_date_ms: Option<i64>,
    /// Only set for subscriptions.
    #[serde(rename = "expirationDateMS")]
    pub expiration_date_ms: Option<i64>,
    #[serde(rename = "cancellationDateMS")]
    pub cancellation_date_ms: Option<i64>,
    pub is_trial_period: bool,
    pub quantity: i64,
}

impl PurchasedItem {
    /// Whether the item no longer grants access. Cancelled items always
    /// count as expired; items without an expiration date never expire.
    pub fn is_expired(&self) -> Result<bool, IapAppleError> {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> Result<bool, IapAppleError> {
        self.ensure_valid()?;
        if self.cancellation_date_ms.is_some() {
            return Ok(true);
        }
        Ok(match self.expiration_date_ms {
            Some(expiration_ms) => now_ms >= expiration_ms,
            None => false,
        })
    }

    pub fn is_canceled(&self) -> Result<bool, IapAppleError> {
        self.ensure_valid()?;
        Ok(self.cancellation_date_ms.is_some())
    }

    pub fn purchase_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.purchase_date_ms)
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.expiration_date_ms
            .and_then(DateTime::from_timestamp_millis)
    }

    pub fn cancellation_time(&self) -> Option<DateTime<Utc>> {
        self.cancellation_date_ms
            .and_then(DateTime::from_timestamp_millis)
    }

    fn ensure_valid(&self) -> Result<(), IapAppleError> {
        if self.transaction_id.is_empty() {
            return Err(IapAppleError::InvalidPurchasedItem);
        }
        Ok(())
    }
}
