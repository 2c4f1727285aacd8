use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::receipt_status::ReceiptStatus;

/// Response body of the verifyReceipt endpoint:
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// Kept in wire form. Apple encodes numbers and booleans inside transaction
/// records as strings; they are only parsed when building
/// [`PurchasedItem`](super::purchased_item::PurchasedItem)s.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedReceipt {
    /// Either 0 if the receipt is valid, or a status code if there is an
    /// error. The status code reflects the status of the app receipt as a
    /// whole.
    pub status: ReceiptStatus,
    /// The environment for which the receipt was generated.
    #[serde(default)]
    pub environment: Option<Environment>,
    /// A JSON representation of the receipt that was sent for verification.
    #[serde(default)]
    pub receipt: Option<Receipt>,
    /// The latest Base64 encoded app receipt. Only returned for receipts that
    /// contain auto-renewable subscriptions.
    #[serde(default)]
    pub latest_receipt: Option<String>,
    /// All in-app purchase transactions, excluding consumables marked as
    /// finished. Only returned for receipts that contain auto-renewable
    /// subscriptions.
    #[serde(default)]
    pub latest_receipt_info: Option<Vec<ReceiptInAppItem>>,
    /// A value of true indicates a temporary issue; retry validation for this
    /// receipt at a later time. Only applicable to status codes 21100-21199.
    #[serde(default, rename = "is-retryable")]
    pub is_retryable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Sandbox,
    Production,

    #[serde(untagged)]
    Unknown(String),
}

/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// The bundle identifier for the app to which the receipt belongs.
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub application_version: Option<String>,
    /// In-app purchase receipt fields for all in-app purchase transactions.
    #[serde(default)]
    pub in_app: Option<Vec<ReceiptInAppItem>>,
    /// Older response shape placing the renewal history inside the receipt.
    #[serde(default)]
    pub latest_receipt_info: Option<Vec<ReceiptInAppItem>>,
    #[serde(default)]
    pub original_application_version: Option<String>,
    #[serde(default)]
    pub receipt_creation_date_ms: Option<String>,
    /// Expiry of receipts for apps purchased through the Volume Purchase
    /// Program.
    #[serde(default)]
    pub expiration_date_ms: Option<String>,
    #[serde(default)]
    pub original_purchase_date: Option<String>,
    /// Identifies the app purchased. Only assigned in production.
    #[serde(default)]
    pub app_item_id: Option<String>,
    #[serde(default)]
    pub version_external_identifier: Option<String>,
}

/// A single purchase or renewal event:
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
///
/// Every field is optional on the wire and every value is a string.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptInAppItem {
    /// The number of items purchased.
    pub quantity: Option<String>,
    pub product_id: Option<String>,
    pub transaction_id: Option<String>,
    /// For a transaction that restores a previous transaction, the
    /// transaction identifier of the original transaction. Otherwise,
    /// identical to the transaction identifier.
    pub original_transaction_id: Option<String>,
    pub purchase_date: Option<String>,
    pub purchase_date_ms: Option<String>,
    pub original_purchase_date: Option<String>,
    pub original_purchase_date_ms: Option<String>,
    /// Only present for auto-renewable subscription receipts.
    pub expires_date: Option<String>,
    pub expires_date_ms: Option<String>,
    /// For an expired subscription, the reason for the expiration ("1" to
    /// "5").
    pub expiration_intent: Option<String>,
    /// "true" if the subscription is currently in the free trial period.
    pub is_trial_period: Option<String>,
    pub is_in_intro_offer_period: Option<String>,
    /// Set when Apple customer support cancelled the transaction, or when an
    /// auto-renewable subscription plan was upgraded.
    pub cancellation_date: Option<String>,
    pub cancellation_date_ms: Option<String>,
    /// "1" for an issue within the app, "0" for another reason.
    pub cancellation_reason: Option<String>,
    pub web_order_line_item_id: Option<String>,
    pub app_item_id: Option<String>,
}

impl VerifiedReceipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }

    /// Renewal history, looked up in both places Apple has used for it. The
    /// top-level array wins when both are present.
    pub(crate) fn renewal_history(&self) -> Option<&[ReceiptInAppItem]> {
        self.latest_receipt_info.as_deref().or_else(|| {
            self.receipt
                .as_ref()
                .and_then(|r| r.latest_receipt_info.as_deref())
        })
    }

    /// Every transaction record in the response, from all locations.
    pub(crate) fn all_transactions(&self) -> impl Iterator<Item = &ReceiptInAppItem> {
        let receipt = self.receipt.as_ref();
        receipt
            .and_then(|r| r.in_app.as_deref())
            .unwrap_or_default()
            .iter()
            .chain(
                receipt
                    .and_then(|r| r.latest_receipt_info.as_deref())
                    .unwrap_or_default(),
            )
            .chain(self.latest_receipt_info.as_deref().unwrap_or_default())
    }

    /// Latest expiration across all transaction records, in milliseconds.
    /// Unparseable timestamps are ignored.
    pub(crate) fn max_expiration_ms(&self) -> Option<i64> {
        self.all_transactions()
            .filter_map(|item| item.expires_date_ms.as_deref())
            .filter_map(|ms| ms.parse::<i64>().ok())
            .max()
    }
}
