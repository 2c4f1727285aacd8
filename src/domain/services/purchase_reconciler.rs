use std::collections::HashSet;

use crate::{
    domain::entities::{
        purchased_item::PurchasedItem,
        verified_receipt::{ReceiptInAppItem, VerifiedReceipt},
    },
    errors::IapAppleError,
};

/// Builds the deduplicated list of purchased items from a verified
/// response, most recent purchase first.
///
/// Transactions from `receipt.in_app` and from the renewal history are
/// merged, then each original transaction ID keeps only its latest record.
/// A missing response or receipt yields an empty list.
pub fn get_purchased_items(
    response: Option<&VerifiedReceipt>,
) -> Result<Vec<PurchasedItem>, IapAppleError> {
    let Some(response) = response else {
        return Ok(Vec::new());
    };
    let Some(receipt) = response.receipt.as_ref() else {
        return Ok(Vec::new());
    };

    let records = receipt
        .in_app
        .as_deref()
        .unwrap_or_default()
        .iter()
        .chain(response.renewal_history().unwrap_or_default());

    // Superseded records are dropped before any field but the sort key is
    // parsed.
    let mut records = records
        .map(|record| purchase_date_ms(record).map(|ms| (ms, record)))
        .collect::<Result<Vec<_>, _>>()?;

    // Stable, so records with equal timestamps keep their source order.
    records.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut seen_lineages = HashSet::new();
    records
        .into_iter()
        .filter(|(_, record)| seen_lineages.insert(lineage_id(record)))
        .map(|(_, record)| PurchasedItem::from_in_app_item(record, &receipt.bundle_id))
        .collect()
}

impl PurchasedItem {
    fn from_in_app_item(item: &ReceiptInAppItem, bundle_id: &str) -> Result<Self, IapAppleError> {
        Ok(PurchasedItem {
            bundle_id: bundle_id.to_string(),
            app_item_id: item.app_item_id.clone(),
            original_transaction_id: lineage_id(item),
            transaction_id: item.transaction_id.clone().unwrap_or_default(),
            product_id: item.product_id.clone().unwrap_or_default(),
            purchase_date_ms: purchase_date_ms(item)?,
            original_purchase_date_ms: parse_int(
                "original_purchase_date_ms",
                item.original_purchase_date_ms.as_deref(),
            )?,
            expiration_date_ms: parse_int("expires_date_ms", item.expires_date_ms.as_deref())?,
            cancellation_date_ms: parse_int(
                "cancellation_date_ms",
                item.cancellation_date_ms.as_deref(),
            )?,
            is_trial_period: item.is_trial_period.as_deref() == Some("true"),
            quantity: parse_int("quantity", item.quantity.as_deref())?.unwrap_or(1),
        })
    }
}

/// Original transaction ID, or the record's own transaction ID when absent.
fn lineage_id(item: &ReceiptInAppItem) -> String {
    item
        .original_transaction_id
        .clone()
        .or_else(|| item.transaction_id.clone())
        .unwrap_or_default()
}

fn purchase_date_ms(item: &ReceiptInAppItem) -> Result<i64, IapAppleError> {
    parse_int("purchase_date_ms", item.purchase_date_ms.as_deref())?.ok_or_else(|| {
        IapAppleError::MalformedTransactionRecord {
            field: "purchase_date_ms",
            value: String::new(),
        }
    })
}

/// Parses an optional integer field. Empty strings count as absent.
fn parse_int(field: &'static str, value: Option<&str>) -> Result<Option<i64>, IapAppleError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| IapAppleError::MalformedTransactionRecord {
                field,
                value: v.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{receipt_status::ReceiptStatus, verified_receipt::Receipt};

    fn record(
        product_id: &str,
        transaction_id: &str,
        original_transaction_id: &str,
        purchase_date_ms: &str,
        expires_date_ms: &str,
    ) -> ReceiptInAppItem {
        ReceiptInAppItem {
            quantity: Some("1".to_string()),
            product_id: Some(product_id.to_string()),
            transaction_id: Some(transaction_id.to_string()),
            original_transaction_id: Some(original_transaction_id.to_string()),
            purchase_date_ms: Some(purchase_date_ms.to_string()),
            original_purchase_date_ms: Some("1520539136000".to_string()),
            expires_date_ms: Some(expires_date_ms.to_string()),
            is_trial_period: Some("false".to_string()),
            ..Default::default()
        }
    }

    fn response(
        in_app: Option<Vec<ReceiptInAppItem>>,
        receipt_lri: Option<Vec<ReceiptInAppItem>>,
        top_level_lri: Option<Vec<ReceiptInAppItem>>,
    ) -> VerifiedReceipt {
        VerifiedReceipt {
            status: ReceiptStatus::Success,
            environment: None,
            receipt: Some(Receipt {
                bundle_id: "com.example.app".to_string(),
                in_app,
                latest_receipt_info: receipt_lri,
                ..Default::default()
            }),
            latest_receipt: None,
            latest_receipt_info: top_level_lri,
            is_retryable: None,
        }
    }

    #[test]
    fn test_collapses_renewals_into_latest_record() {
        let renewals = [
            ("1000000381600687", "1520539135000", "1520539435000"),
            ("1000000381600903", "1520539435000", "1520539735000"),
            ("1000000381601336", "1520539755000", "1520540055000"),
            ("1000000381601740", "1520540070000", "1520540370000"),
            ("1000000381602052", "1520540370000", "1520540670000"),
            ("1000000381602343", "1520540670000", "1520540970000"),
        ]
        .iter()
        .map(|(tid, purchase, expires)| {
            record("basicmembership", tid, "1000000381600687", purchase, expires)
        })
        .collect();

        let items = get_purchased_items(Some(&response(Some(vec![]), Some(renewals), None))).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].original_transaction_id, "1000000381600687");
        assert_eq!(items[0].transaction_id, "1000000381602343");
        assert_eq!(items[0].purchase_date_ms, 1520540670000);
        assert_eq!(items[0].expiration_date_ms, Some(1520540970000));
        assert!(!items[0].is_trial_period);
        assert_eq!(items[0].bundle_id, "com.example.app");
    }

    #[test]
    fn test_merges_in_app_with_top_level_history() {
        let in_app = vec![record(
            "in_app.0",
            "210000259386802",
            "210000259386802",
            "1460649813000",
            "1463241813000",
        )];
        let history = vec![
            record(
                "latest_receipt_info.0",
                "210000259386803",
                "210000259386803",
                "1460649813982",
                "1463241813982",
            ),
            record(
                "latest_receipt_info.1",
                "210000265773203",
                "210000265773203",
                "1463241813000",
                "1465920213000",
            ),
        ];

        let items = get_purchased_items(Some(&response(Some(in_app), None, Some(history)))).unwrap();

        let product_ids: Vec<_> = items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(
            product_ids,
            ["latest_receipt_info.1", "latest_receipt_info.0", "in_app.0"]
        );
    }

    #[test]
    fn test_only_in_app_populated() {
        let in_app = vec![record(
            "in_app.0",
            "210000259386802",
            "210000259386802",
            "1460649813000",
            "1463241813000",
        )];

        let items = get_purchased_items(Some(&response(Some(in_app), None, None))).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, "in_app.0");
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_top_level_history_takes_precedence() {
        let nested = vec![record("nested", "1", "1", "100", "200")];
        let top_level = vec![record("top_level", "2", "2", "100", "200")];

        let items =
            get_purchased_items(Some(&response(None, Some(nested), Some(top_level)))).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, "top_level");
    }

    #[test]
    fn test_missing_response_or_receipt_is_empty() {
        assert!(get_purchased_items(None).unwrap().is_empty());

        let mut no_receipt = response(None, None, None);
        no_receipt.receipt = None;
        assert!(get_purchased_items(Some(&no_receipt)).unwrap().is_empty());
    }

    #[test]
    fn test_trial_flag_requires_exact_literal() {
        let mut trial = record("a", "1", "1", "100", "200");
        trial.is_trial_period = Some("true".to_string());
        let mut shouting = record("b", "2", "2", "90", "200");
        shouting.is_trial_period = Some("TRUE".to_string());
        let mut missing = record("c", "3", "3", "80", "200");
        missing.is_trial_period = None;

        let items =
            get_purchased_items(Some(&response(Some(vec![trial, shouting, missing]), None, None)))
                .unwrap();

        let flags: Vec<_> = items.iter().map(|i| i.is_trial_period).collect();
        assert_eq!(flags, [true, false, false]);
    }

    #[test]
    fn test_missing_lineage_falls_back_to_transaction_id() {
        let mut orphan = record("a", "42", "", "100", "200");
        orphan.original_transaction_id = None;
        orphan.quantity = None;

        let items = get_purchased_items(Some(&response(Some(vec![orphan]), None, None))).unwrap();

        assert_eq!(items[0].original_transaction_id, "42");
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_superseded_record_fields_are_not_parsed() {
        let mut superseded = record("a", "old", "lineage", "100", "200");
        superseded.quantity = Some("n/a".to_string());
        let latest = record("a", "new", "lineage", "200", "300");

        let items =
            get_purchased_items(Some(&response(Some(vec![superseded, latest]), None, None)))
                .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].transaction_id, "new");
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_malformed_field_on_surviving_record_is_reported() {
        let mut latest = record("a", "new", "lineage", "200", "300");
        latest.expires_date_ms = Some("soon".to_string());
        let superseded = record("a", "old", "lineage", "100", "200");

        let result =
            get_purchased_items(Some(&response(Some(vec![superseded, latest]), None, None)));

        assert!(matches!(
            result,
            Err(IapAppleError::MalformedTransactionRecord {
                field: "expires_date_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_unparseable_purchase_date_is_reported() {
        let broken = record("a", "1", "1", "yesterday", "200");

        let result = get_purchased_items(Some(&response(Some(vec![broken]), None, None)));

        match result {
            Err(IapAppleError::MalformedTransactionRecord { field, value }) => {
                assert_eq!(field, "purchase_date_ms");
                assert_eq!(value, "yesterday");
            }
            other => panic!("Expected MalformedTransactionRecord, got {:?}", other),
        }
    }
}
