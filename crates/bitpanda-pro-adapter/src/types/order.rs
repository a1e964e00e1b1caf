/*
[INPUT]:  Caller-supplied order parameters
[OUTPUT]: Validated order variants and their flat wire representation
[POS]:    Data layer - order lifecycle model and request marshalling
[UPDATE]: When the exchange order schema or validation rules change
*/

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::http::{Error, Result};

use super::enums::{OrderType, Side, TimeInForce};

/// An outbound order. Variants carry exactly the fields that are legal for
/// their type; anything else is rejected by [`OrderBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Limit(LimitOrder),
    Market(MarketOrder),
    Stop(StopOrder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrder {
    pub instrument_code: String,
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
    pub time_in_force: TimeInForce,
    /// Required iff `time_in_force` is `GoodTillTime`. Minute granularity.
    pub expire_after: Option<DateTime<Utc>>,
    pub is_post_only: bool,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrder {
    pub instrument_code: String,
    pub side: Side,
    pub amount: Decimal,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopOrder {
    pub instrument_code: String,
    pub side: Side,
    pub amount: Decimal,
    /// Limit price once the trigger fires.
    pub price: Decimal,
    pub trigger_price: Decimal,
    pub client_id: Option<Uuid>,
}

impl Order {
    /// Start building an order of the given type.
    pub fn builder(
        instrument_code: impl Into<String>,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
    ) -> OrderBuilder {
        OrderBuilder::new(instrument_code, side, order_type, amount)
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            Order::Limit(_) => OrderType::Limit,
            Order::Market(_) => OrderType::Market,
            Order::Stop(_) => OrderType::Stop,
        }
    }

    pub fn instrument_code(&self) -> &str {
        match self {
            Order::Limit(o) => &o.instrument_code,
            Order::Market(o) => &o.instrument_code,
            Order::Stop(o) => &o.instrument_code,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Order::Limit(o) => o.side,
            Order::Market(o) => o.side,
            Order::Stop(o) => o.side,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Order::Limit(o) => o.amount,
            Order::Market(o) => o.amount,
            Order::Stop(o) => o.amount,
        }
    }

    pub fn client_id(&self) -> Option<Uuid> {
        match self {
            Order::Limit(o) => o.client_id,
            Order::Market(o) => o.client_id,
            Order::Stop(o) => o.client_id,
        }
    }

    /// Project the order down to the flat key/value map the exchange expects.
    ///
    /// Only keys applicable to the variant are emitted, with wire-string enum
    /// values and decimals as strings. Data-dependent rules are re-checked
    /// here so an order mutated after construction still fails instead of
    /// producing a payload the exchange would reject.
    pub fn to_params(&self) -> Result<Map<String, Value>> {
        if self.amount() <= Decimal::ZERO {
            return Err(Error::Validation("amount must be positive".into()));
        }

        let mut params = Map::new();
        params.insert(
            "instrument_code".into(),
            Value::String(self.instrument_code().to_string()),
        );
        params.insert("side".into(), Value::String(self.side().as_str().into()));
        params.insert(
            "type".into(),
            Value::String(self.order_type().as_str().into()),
        );
        params.insert("amount".into(), Value::String(self.amount().to_string()));

        match self {
            Order::Limit(order) => {
                if order.price <= Decimal::ZERO {
                    return Err(Error::Validation("price must be positive".into()));
                }
                params.insert("price".into(), Value::String(order.price.to_string()));
                params.insert(
                    "time_in_force".into(),
                    Value::String(order.time_in_force.as_str().into()),
                );
                match (order.time_in_force, order.expire_after) {
                    (TimeInForce::GoodTillTime, Some(expire_after)) => {
                        params.insert(
                            "expire_after".into(),
                            Value::String(format_expiry(expire_after)),
                        );
                    }
                    (TimeInForce::GoodTillTime, None) => {
                        return Err(Error::Validation(
                            "expire_after is required for GOOD_TILL_TIME orders".into(),
                        ));
                    }
                    (_, Some(_)) => {
                        return Err(Error::Validation(
                            "expire_after is only valid for GOOD_TILL_TIME orders".into(),
                        ));
                    }
                    (_, None) => {}
                }
                if order.is_post_only {
                    if matches!(
                        order.time_in_force,
                        TimeInForce::ImmediateOrCancelled | TimeInForce::FillOrKill
                    ) {
                        return Err(Error::Validation(
                            "is_post_only is only valid for GOOD_TILL_CANCELLED \
                             and GOOD_TILL_TIME orders"
                                .into(),
                        ));
                    }
                    params.insert("is_post_only".into(), Value::Bool(true));
                }
            }
            Order::Market(_) => {}
            Order::Stop(order) => {
                if order.price <= Decimal::ZERO || order.trigger_price <= Decimal::ZERO {
                    return Err(Error::Validation(
                        "price and trigger_price must be positive".into(),
                    ));
                }
                params.insert("price".into(), Value::String(order.price.to_string()));
                params.insert(
                    "trigger_price".into(),
                    Value::String(order.trigger_price.to_string()),
                );
            }
        }

        if let Some(client_id) = self.client_id() {
            params.insert("client_id".into(), Value::String(client_id.to_string()));
        }

        Ok(params)
    }
}

/// Builder validating per-variant field applicability before an [`Order`]
/// exists. A `price` supplied for a market order is dropped (the exchange
/// ignores it); every other inapplicable field is an error.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    instrument_code: String,
    side: Side,
    order_type: OrderType,
    amount: Decimal,
    price: Option<Decimal>,
    trigger_price: Option<Decimal>,
    time_in_force: Option<TimeInForce>,
    expire_after: Option<DateTime<Utc>>,
    is_post_only: bool,
    client_id: Option<Uuid>,
}

impl OrderBuilder {
    pub fn new(
        instrument_code: impl Into<String>,
        side: Side,
        order_type: OrderType,
        amount: Decimal,
    ) -> Self {
        Self {
            instrument_code: instrument_code.into(),
            side,
            order_type,
            amount,
            price: None,
            trigger_price: None,
            time_in_force: None,
            expire_after: None,
            is_post_only: false,
            client_id: None,
        }
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn trigger_price(mut self, trigger_price: Decimal) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn expire_after(mut self, expire_after: DateTime<Utc>) -> Self {
        self.expire_after = Some(expire_after);
        self
    }

    pub fn post_only(mut self) -> Self {
        self.is_post_only = true;
        self
    }

    pub fn client_id(mut self, client_id: Uuid) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn build(self) -> Result<Order> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation("amount must be positive".into()));
        }

        match self.order_type {
            OrderType::Limit => {
                let price = require_positive(self.price, "price")?;
                if self.trigger_price.is_some() {
                    return Err(Error::Validation(
                        "trigger_price is only valid for STOP orders".into(),
                    ));
                }
                let time_in_force = self.time_in_force.unwrap_or_default();
                let expire_after = match (time_in_force, self.expire_after) {
                    (TimeInForce::GoodTillTime, Some(expire_after)) => {
                        if expire_after <= Utc::now() {
                            return Err(Error::Validation(
                                "expire_after must be in the future".into(),
                            ));
                        }
                        Some(truncate_to_minute(expire_after))
                    }
                    (TimeInForce::GoodTillTime, None) => {
                        return Err(Error::Validation(
                            "expire_after is required for GOOD_TILL_TIME orders".into(),
                        ));
                    }
                    (_, Some(_)) => {
                        return Err(Error::Validation(
                            "expire_after is only valid for GOOD_TILL_TIME orders".into(),
                        ));
                    }
                    (_, None) => None,
                };
                if self.is_post_only
                    && matches!(
                        time_in_force,
                        TimeInForce::ImmediateOrCancelled | TimeInForce::FillOrKill
                    )
                {
                    return Err(Error::Validation(
                        "is_post_only is only valid for GOOD_TILL_CANCELLED \
                         and GOOD_TILL_TIME orders"
                            .into(),
                    ));
                }
                Ok(Order::Limit(LimitOrder {
                    instrument_code: self.instrument_code,
                    side: self.side,
                    amount: self.amount,
                    price,
                    time_in_force,
                    expire_after,
                    is_post_only: self.is_post_only,
                    client_id: self.client_id,
                }))
            }
            OrderType::Market => {
                // price is documented as ignored for market orders and dropped
                if self.trigger_price.is_some() {
                    return Err(Error::Validation(
                        "trigger_price is only valid for STOP orders".into(),
                    ));
                }
                if self.time_in_force.is_some() || self.expire_after.is_some() {
                    return Err(Error::Validation(
                        "time_in_force is only valid for LIMIT orders".into(),
                    ));
                }
                if self.is_post_only {
                    return Err(Error::Validation(
                        "is_post_only is only valid for LIMIT orders".into(),
                    ));
                }
                Ok(Order::Market(MarketOrder {
                    instrument_code: self.instrument_code,
                    side: self.side,
                    amount: self.amount,
                    client_id: self.client_id,
                }))
            }
            OrderType::Stop => {
                let price = require_positive(self.price, "price")?;
                let trigger_price = require_positive(self.trigger_price, "trigger_price")?;
                if self.time_in_force.is_some() || self.expire_after.is_some() {
                    return Err(Error::Validation(
                        "time_in_force is only valid for LIMIT orders".into(),
                    ));
                }
                if self.is_post_only {
                    return Err(Error::Validation(
                        "is_post_only is only valid for LIMIT orders".into(),
                    ));
                }
                Ok(Order::Stop(StopOrder {
                    instrument_code: self.instrument_code,
                    side: self.side,
                    amount: self.amount,
                    price,
                    trigger_price,
                    client_id: self.client_id,
                }))
            }
        }
    }
}

fn require_positive(value: Option<Decimal>, field: &str) -> Result<Decimal> {
    match value {
        Some(value) if value > Decimal::ZERO => Ok(value),
        Some(_) => Err(Error::Validation(format!("{field} must be positive"))),
        None => Err(Error::Validation(format!("{field} is required"))),
    }
}

fn truncate_to_minute(time: DateTime<Utc>) -> DateTime<Utc> {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

fn format_expiry(time: DateTime<Utc>) -> String {
    truncate_to_minute(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// An order as acknowledged by the exchange. Only ever built from a
/// response payload; `order_id`, `account_id`, `time` and `filled_amount`
/// are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessfulOrder {
    pub order_id: Uuid,
    pub account_id: Uuid,
    pub instrument_code: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub filled_amount: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_post_only: Option<bool>,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    pub time: DateTime<Utc>,
}
