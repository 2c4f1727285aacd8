use thiserror::Error;

use crate::domain::entities::{receipt_status::ReceiptStatus, verified_receipt::VerifiedReceipt};

/// Failure modes of receipt verification and purchase normalization.
///
/// Every verification failure exposes the same shape through
/// [`IapAppleError::rejection_message`] and [`IapAppleError::data`], so
/// callers can branch either on the message or on the underlying status code.
#[derive(Debug, Error)]
pub enum IapAppleError {
    /// The callout itself failed: network error, non-200 HTTP status, or a
    /// body that could not be decoded.
    #[error("{message}")]
    Transport { endpoint: String, message: String },

    /// Apple answered with a well-formed response carrying a non-success
    /// status.
    #[error("{message}")]
    Rejected {
        status: ReceiptStatus,
        message: String,
        data: Box<VerifiedReceipt>,
    },

    /// Apple answered with a success status, but the receipt contains no
    /// transactions.
    #[error("Detected valid receipt, however purchase list is empty")]
    EmptyPurchaseList { data: Box<VerifiedReceipt> },

    #[error("Unable to validate receipt using appstore endpoints.")]
    Unavailable,

    #[error(
        "Detected invalid purchased item! Make sure object is defined and it has transaction id."
    )]
    InvalidPurchasedItem,

    #[error("Transaction record field '{field}' could not be parsed: {value:?}")]
    MalformedTransactionRecord { field: &'static str, value: String },
}

impl IapAppleError {
    pub(crate) fn rejected(data: VerifiedReceipt) -> Self {
        Self::Rejected {
            status: data.status,
            message: data.status.message().to_string(),
            data: Box::new(data),
        }
    }

    pub fn rejection_message(&self) -> String {
        self.to_string()
    }

    /// The raw response that produced this rejection, if there was one.
    pub fn data(&self) -> Option<&VerifiedReceipt> {
        match self {
            Self::Rejected { data, .. } | Self::EmptyPurchaseList { data } => Some(data),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<ReceiptStatus> {
        self.data().map(|data| data.status)
    }

    /// Whether Apple flagged the failure as temporary. Only meaningful for
    /// the 21100-21199 range.
    pub fn is_retryable(&self) -> bool {
        self.data()
            .and_then(|data| data.is_retryable)
            .unwrap_or(false)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {name} value '{value}': expected true or false")]
    InvalidBool { name: &'static str, value: String },
}
