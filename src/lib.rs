pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod verify_receipt_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt_api {
            pub(crate) mod request_body_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod purchased_item;
        pub mod receipt_status;
        pub mod verified_receipt;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
    pub mod services {
        pub mod purchase_reconciler;
    }
}

pub mod config;
pub mod constants;
pub mod errors;
pub mod logger;
pub mod util;

pub use config::VerifyReceiptConfig;
pub use data::{
    datasources::verify_receipt_datasource::{
        ReceiptEndpoint, VerifyReceiptDatasource, VerifyReceiptDatasourceImpl,
    },
    models::verify_receipt_api::request_body_model::RequestBodyModel,
    repositories::receipt_repository_impl::ReceiptRepositoryImpl,
};
pub use domain::entities::{
    purchased_item::PurchasedItem,
    receipt_status::ReceiptStatus,
    verified_receipt::{Environment, Receipt, ReceiptInAppItem, VerifiedReceipt},
};
pub use domain::repositories::receipt_repository::ReceiptRepository;
pub use errors::{ConfigError, IapAppleError};
pub use logger::{ReceiptLogger, TracingLogger};
pub use util::{
    get_purchased_items, is_purchased_item_canceled, is_purchased_item_expired,
    is_verified_receipt, verify_receipt, AppleReceiptUtil,
};
