use serde::{Deserialize, Serialize};

/// Status code returned by the verifyReceipt endpoint:
/// https://developer.apple.com/documentation/appstorereceipts/status
///
/// Codes round-trip through their integer form, so codes Apple adds later
/// are kept as `Unknown` rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ReceiptStatus {
    Success,
    /// The receipt is valid, but purchased nothing.
    ValidNoPurchase,
    /// The App Store could not read the JSON object provided.
    CannotReadJson,
    /// The data in the receipt-data property was malformed.
    DataMalformed,
    ReceiptNotAuthenticated,
    SharedSecretDoesntMatch,
    ServerNotAvailable,
    /// Returned both for genuinely expired subscriptions and for cancelled
    /// subscriptions that have not reached their expiry yet.
    SubscriptionExpired,
    /// A sandbox receipt was sent to the production service.
    TestEnvReceiptDetected,
    /// A production receipt was sent to the sandbox service.
    ProductionEnvReceiptDetected,
    InternalDataAccessError,
    UserAccountDeleted,

    Unknown(i32),
}

impl ReceiptStatus {
    pub fn code(self) -> i32 {
        self.into()
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "No error.",
            Self::ValidNoPurchase => "The receipt is valid, but purchased nothing.",
            Self::CannotReadJson => "The App Store could not read the JSON object you provided.",
            Self::DataMalformed => "The data in the receipt-data property was malformed.",
            Self::ReceiptNotAuthenticated => "The receipt could not be authenticated.",
            Self::SharedSecretDoesntMatch => {
                "The shared secret you provided does not match the shared secret on file for your account."
            }
            Self::ServerNotAvailable => "The receipt server is not currently available.",
            Self::SubscriptionExpired => {
                "This receipt is valid but the subscription has expired. When this status code is returned to your server, the receipt data is also decoded and returned as part of the response."
            }
            Self::TestEnvReceiptDetected => {
                "This receipt is a sandbox receipt, but it was sent to the production service for verification."
            }
            Self::ProductionEnvReceiptDetected => {
                "This receipt is a production receipt, but it was sent to the sandbox service for verification."
            }
            Self::InternalDataAccessError => "Internal data access error. Try again later",
            Self::UserAccountDeleted => "The user account cannot be found or has been deleted",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<i32> for ReceiptStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Success,
            2 => Self::ValidNoPurchase,
            21000 => Self::CannotReadJson,
            21002 => Self::DataMalformed,
            21003 => Self::ReceiptNotAuthenticated,
            21004 => Self::SharedSecretDoesntMatch,
            21005 => Self::ServerNotAvailable,
            21006 => Self::SubscriptionExpired,
            21007 => Self::TestEnvReceiptDetected,
            21008 => Self::ProductionEnvReceiptDetected,
            21009 => Self::InternalDataAccessError,
            21010 => Self::UserAccountDeleted,
            other => Self::Unknown(other),
        }
    }
}

impl From<ReceiptStatus> for i32 {
    fn from(status: ReceiptStatus) -> Self {
        match status {
            ReceiptStatus::Success => 0,
            ReceiptStatus::ValidNoPurchase => 2,
            ReceiptStatus::CannotReadJson => 21000,
            ReceiptStatus::DataMalformed => 21002,
            ReceiptStatus::ReceiptNotAuthenticated => 21003,
            ReceiptStatus::SharedSecretDoesntMatch => 21004,
            ReceiptStatus::ServerNotAvailable => 21005,
            ReceiptStatus::SubscriptionExpired => 21006,
            ReceiptStatus::TestEnvReceiptDetected => 21007,
            ReceiptStatus::ProductionEnvReceiptDetected => 21008,
            ReceiptStatus::InternalDataAccessError => 21009,
            ReceiptStatus::UserAccountDeleted => 21010,
            ReceiptStatus::Unknown(code) => code,
        }
    }
}
