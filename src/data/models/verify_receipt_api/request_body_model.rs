use serde::Serialize;

/// Request body of the verifyReceipt endpoint:
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBodyModel {
    /// The Base64-encoded receipt data.
    #[serde(rename = "receipt-data")]
    pub receipt_data: String,
    /// The app's shared secret.
    pub password: String,
    /// Only return the latest renewal transaction for each subscription.
    #[serde(rename = "exclude-old-transactions")]
    pub exclude_old_transactions: bool,
}

impl RequestBodyModel {
    /// JSON form for diagnostics, with the shared secret masked.
    pub(crate) fn to_log_string(&self) -> String {
        let masked = Self {
            password: "*".repeat(self.password.len().min(8)),
            ..self.clone()
        };
        serde_json::to_string_pretty(&masked).unwrap_or_default()
    }
}
