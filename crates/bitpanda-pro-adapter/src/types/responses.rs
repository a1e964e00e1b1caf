/*
[INPUT]:  Exchange JSON envelopes and serde requirements
[OUTPUT]: Typed wrappers for paginated and composite responses
[POS]:    Data layer - response envelopes
[UPDATE]: When API schema changes or new endpoints added
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Deposit, Fee, Trade, Withdrawal};
use super::order::SuccessfulOrder;

/// A fill paired with the fee it incurred, as nested in order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub trade: Trade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
}

/// `GET /account/orders/{id}` payload: the order plus its fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithTrades {
    pub order: SuccessfulOrder,
    #[serde(default)]
    pub trades: Vec<TradeEntry>,
}

/// One page of order history. The cursor is opaque and absent on the last
/// page; callers loop themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHistory {
    pub order_history: Vec<OrderWithTrades>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of cleared deposits, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositHistory {
    pub deposit_history: Vec<Deposit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// One page of cleared withdrawals, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalHistory {
    pub withdrawal_history: Vec<Withdrawal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// `PUT /account/orders/{id}` payload: the applied amount change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdated {
    pub order_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

/// `POST /account/withdraw/fiat` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiatWithdraw {
    pub transaction_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_history_carries_opaque_cursor() {
        let payload = json!({
            "order_history": [],
            "max_page_size": 100,
            "cursor": "eyJhY2NvdW50X2lkIjp7fX0="
        });
        let history: OrderHistory = serde_json::from_value(payload).unwrap();
        assert_eq!(history.cursor.as_deref(), Some("eyJhY2NvdW50X2lkIjp7fX0="));
        assert!(history.order_history.is_empty());
    }

    #[test]
    fn last_page_has_no_cursor() {
        let payload = json!({"deposit_history": []});
        let history: DepositHistory = serde_json::from_value(payload).unwrap();
        assert_eq!(history.cursor, None);
    }
}
