pub const PRODUCTION_VERIFY_RECEIPT_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub const SANDBOX_VERIFY_RECEIPT_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

pub(crate) const LOG_PREFIX: &str = "[iap-apple]";
pub(crate) const TRACING_TARGET: &str = "iap_apple";

pub const APPLE_SHARED_SECRET_ENV: &str = "APPLE_SHARED_SECRET";
pub const APPLE_EXCLUDE_OLD_TRANSACTIONS_ENV: &str = "APPLE_EXCLUDE_OLD_TRANSACTIONS";
pub const APPLE_FORCE_SANDBOX_ENV: &str = "APPLE_FORCE_SANDBOX";
