use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Persistence Models
// ============================================================================
//
// Flat records as they live in the store. Orders point at their customer
// through `customer_id` only; there is no in-memory back-reference.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub number: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, FromRow)]
pub struct Order {
    pub id: i64,
    pub item: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub customer_id: i64,
    pub time: Option<DateTime<Utc>>,
}

// ============================================================================
// Insert Models
// These carry already-validated fields; identities are assigned by the store
// ============================================================================

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub name: String,
    pub code: String,
    pub number: String,
}

#[derive(Clone, Debug)]
pub struct NewOrder {
    pub item: String,
    pub amount: Decimal,
    pub customer_id: i64,
    pub time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_amount_serializes_as_number() {
        let order = Order {
            id: 1,
            item: "Laptop".to_string(),
            amount: dec!(1200.00),
            customer_id: 1,
            time: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["amount"], serde_json::json!(1200.0));
        assert_eq!(json["customer_id"], 1);
        assert!(json["time"].is_null());
    }

    #[test]
    fn test_customer_serialization_is_flat() {
        let customer = Customer {
            id: 7,
            name: "John Doe".to_string(),
            code: "JD123".to_string(),
            number: "+254100716916".to_string(),
        };

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "John Doe",
                "code": "JD123",
                "number": "+254100716916"
            })
        );
    }
}
