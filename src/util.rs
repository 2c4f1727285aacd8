use crate::{
    config::VerifyReceiptConfig,
    data::{
        datasources::verify_receipt_datasource::{
            VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
        },
        repositories::receipt_repository_impl::ReceiptRepositoryImpl,
    },
    domain::{
        entities::{purchased_item::PurchasedItem, verified_receipt::VerifiedReceipt},
        repositories::receipt_repository::ReceiptRepository,
        services::purchase_reconciler,
    },
    errors::IapAppleError,
};

pub struct AppleReceiptUtil<R: ReceiptRepository> {
    receipt_repository: R,
}

impl<R: ReceiptRepository> AppleReceiptUtil<R> {
    pub async fn verify_receipt(
        &self,
        receipt: &str,
        config: &VerifyReceiptConfig,
    ) -> Result<VerifiedReceipt, IapAppleError> {
        self.receipt_repository.verify_receipt(receipt, config).await
    }

    /// Verifies the receipt and returns its deduplicated purchases.
    pub async fn verify_and_get_purchased_items(
        &self,
        receipt: &str,
        config: &VerifyReceiptConfig,
    ) -> Result<Vec<PurchasedItem>, IapAppleError> {
        let verified = self.verify_receipt(receipt, config).await?;
        get_purchased_items(Some(&verified))
    }
}

impl AppleReceiptUtil<ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl>> {
    pub fn new() -> Self {
        Self {
            receipt_repository: ReceiptRepositoryImpl::new(),
        }
    }
}

impl Default for AppleReceiptUtil<ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: VerifyReceiptDatasource> AppleReceiptUtil<ReceiptRepositoryImpl<D>> {
    /// Uses a custom transport instead of the default reqwest client.
    pub fn with_datasource(datasource: D) -> Self {
        Self {
            receipt_repository: ReceiptRepositoryImpl::with_datasource(datasource),
        }
    }
}

/// Verifies a receipt against Apple's production endpoint, falling back to
/// sandbox for sandbox receipts.
pub async fn verify_receipt(
    receipt: &str,
    config: &VerifyReceiptConfig,
) -> Result<VerifiedReceipt, IapAppleError> {
    AppleReceiptUtil::new().verify_receipt(receipt, config).await
}

pub fn is_verified_receipt(response: Option<&VerifiedReceipt>) -> bool {
    response.is_some_and(VerifiedReceipt::is_success)
}

pub fn get_purchased_items(
    response: Option<&VerifiedReceipt>,
) -> Result<Vec<PurchasedItem>, IapAppleError> {
    purchase_reconciler::get_purchased_items(response)
}

pub fn is_purchased_item_expired(item: &PurchasedItem) -> Result<bool, IapAppleError> {
    item.is_expired()
}

pub fn is_purchased_item_canceled(item: &PurchasedItem) -> Result<bool, IapAppleError> {
    item.is_canceled()
}
