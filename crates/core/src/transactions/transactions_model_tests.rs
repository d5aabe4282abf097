#[cfg(test)]
mod tests {
    use crate::repository::Entity;
    use crate::transactions::{NewTransaction, Transaction, TransactionType};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn buy(quantity: rust_decimal::Decimal) -> NewTransaction {
        NewTransaction {
            portfolio_id: "default".to_string(),
            transaction_type: TransactionType::Buy,
            ticker: Some("aapl".to_string()),
            quantity: Some(quantity),
            price: dec!(150),
            total: dec!(-1500),
            date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            notes: Some("Purchase of 10 shares at $150".to_string()),
        }
    }

    #[test]
    fn test_type_codes_and_names() {
        assert_eq!(TransactionType::TransferIn.as_str(), "transfer_in");
        assert_eq!(TransactionType::TransferIn.as_code(), "TRANSFER_IN");
        assert_eq!(TransactionType::Dividend.to_string(), "dividend");
    }

    #[test]
    fn test_type_parses_either_case() {
        assert_eq!("sell".parse::<TransactionType>().unwrap(), TransactionType::Sell);
        assert_eq!("SPLIT".parse::<TransactionType>().unwrap(), TransactionType::Split);
        assert!("HOLD".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_type_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionType::TransferOut).unwrap();
        assert_eq!(json, "\"transfer_out\"");
        let back: TransactionType = serde_json::from_str("\"buy\"").unwrap();
        assert_eq!(back, TransactionType::Buy);
    }

    #[test]
    fn test_into_transaction_assigns_identity() {
        let tx = buy(dec!(10)).into_transaction().unwrap();
        assert!(!tx.id.is_empty());
        assert_eq!(tx.ticker.as_deref(), Some("AAPL"));
        assert_eq!(tx.total, dec!(-1500));
        assert_eq!(tx.partition_key(), "default");
        assert_eq!(<Transaction as Entity>::CONTAINER, "transactions");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = buy(dec!(10)).into_transaction().unwrap();
        let b = buy(dec!(10)).into_transaction().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        assert!(buy(dec!(0)).into_transaction().is_err());
        assert!(buy(dec!(-3)).into_transaction().is_err());
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut input = buy(dec!(1));
        input.price = dec!(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_wire_shape_uses_type_field() {
        let tx = buy(dec!(10)).into_transaction().unwrap();
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "buy");
        assert_eq!(value["quantity"], serde_json::json!(10.0));
        assert_eq!(value["date"], "2024-01-15T00:00:00Z");
        assert!(value.get("transaction_type").is_none());
    }
}
