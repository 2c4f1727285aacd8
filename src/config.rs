use std::{fmt, sync::Arc};

use crate::{
    constants::{
        APPLE_EXCLUDE_OLD_TRANSACTIONS_ENV, APPLE_FORCE_SANDBOX_ENV, APPLE_SHARED_SECRET_ENV,
    },
    errors::ConfigError,
    logger::ReceiptLogger,
};

/// Per-call settings for receipt verification.
#[derive(Clone, Default)]
pub struct VerifyReceiptConfig {
    /// Only return the latest renewal transaction for each subscription.
    pub exclude_old_transactions: bool,
    /// The app's shared secret from App Store Connect. Required for receipts
    /// containing auto-renewable subscriptions.
    pub app_shared_secret: String,
    /// Skip the production endpoint and only verify against the sandbox.
    pub force_sandbox_only: bool,
    pub logger: Option<Arc<dyn ReceiptLogger>>,
}

impl VerifyReceiptConfig {
    pub fn new(app_shared_secret: impl Into<String>) -> Self {
        Self {
            app_shared_secret: app_shared_secret.into(),
            ..Default::default()
        }
    }

    /// Reads `APPLE_SHARED_SECRET` (required), and the optional boolean flags
    /// `APPLE_EXCLUDE_OLD_TRANSACTIONS` and `APPLE_FORCE_SANDBOX`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bool_var = |name: &'static str| -> Result<bool, ConfigError> {
            match lookup(name) {
                None => Ok(false),
                Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                    "" | "0" | "false" | "no" => Ok(false),
                    "1" | "true" | "yes" => Ok(true),
                    _ => Err(ConfigError::InvalidBool { name, value }),
                },
            }
        };
        Ok(Self {
            app_shared_secret: lookup(APPLE_SHARED_SECRET_ENV)
                .ok_or(ConfigError::Missing(APPLE_SHARED_SECRET_ENV))?,
            exclude_old_transactions: bool_var(APPLE_EXCLUDE_OLD_TRANSACTIONS_ENV)?,
            force_sandbox_only: bool_var(APPLE_FORCE_SANDBOX_ENV)?,
            logger: None,
        })
    }

    pub fn with_exclude_old_transactions(mut self, exclude: bool) -> Self {
        self.exclude_old_transactions = exclude;
        self
    }

    pub fn with_force_sandbox_only(mut self, sandbox_only: bool) -> Self {
        self.force_sandbox_only = sandbox_only;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ReceiptLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl fmt::Debug for VerifyReceiptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyReceiptConfig")
            .field("exclude_old_transactions", &self.exclude_old_transactions)
            .field("app_shared_secret", &"<redacted>")
            .field("force_sandbox_only", &self.force_sandbox_only)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
