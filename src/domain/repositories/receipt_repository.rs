use async_trait::async_trait;

use crate::{
    config::VerifyReceiptConfig, domain::entities::verified_receipt::VerifiedReceipt,
    errors::IapAppleError,
};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Verifies a Base64-encoded receipt with Apple and applies the
    /// response-status policy. Only successful, non-empty receipts are
    /// returned; everything else is an [`IapAppleError`].
    async fn verify_receipt(
        &self,
        receipt: &str,
        config: &VerifyReceiptConfig,
    ) -> Result<VerifiedReceipt, IapAppleError>;
}
