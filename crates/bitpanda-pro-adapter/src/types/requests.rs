/*
[INPUT]:  Caller-supplied withdrawal and history-query parameters
[OUTPUT]: Typed request bodies and query parameter lists
[POS]:    Data layer - request-side value objects
[UPDATE]: When API schema changes or new filters added
*/

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::http::{Error, Result};

use super::models::Recipient;

pub const MAX_PAGE_SIZE: u32 = 100;

/// Body of `POST /account/withdraw/crypto`. Request-only; the response is a
/// [`CryptoWithdraw`](super::models::CryptoWithdraw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawCryptoBody {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub recipient: Recipient,
}

impl WithdrawCryptoBody {
    pub fn new(currency: impl Into<String>, amount: Decimal, recipient: Recipient) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation("withdrawal amount must be positive".into()));
        }
        Ok(Self {
            currency: currency.into(),
            amount,
            recipient,
        })
    }
}

/// Body of `POST /account/withdraw/fiat`. The payout account must already
/// be registered with the exchange (tied to an IBAN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawFiatBody {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub payout_account_id: String,
}

impl WithdrawFiatBody {
    pub fn new(
        currency: impl Into<String>,
        amount: Decimal,
        payout_account_id: impl Into<String>,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation("withdrawal amount must be positive".into()));
        }
        Ok(Self {
            currency: currency.into(),
            amount,
            payout_account_id: payout_account_id.into(),
        })
    }
}

/// Filters for `GET /account/orders`. The cursor is opaque; callers loop
/// over pages themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub instrument_code: Option<String>,
    pub with_cancelled_and_rejected: Option<bool>,
    pub with_just_filled_inactive: Option<bool>,
    pub with_just_orders: Option<bool>,
    pub max_page_size: Option<u32>,
    pub cursor: Option<String>,
}

impl OrdersQuery {
    pub(crate) fn query_params(&self) -> Result<Vec<(&'static str, String)>> {
        let mut params = time_window_params(self.start, self.end);
        if let Some(code) = &self.instrument_code {
            params.push(("instrument_code", code.clone()));
        }
        if let Some(flag) = self.with_cancelled_and_rejected {
            params.push(("with_cancelled_and_rejected", flag.to_string()));
        }
        if let Some(flag) = self.with_just_filled_inactive {
            params.push(("with_just_filled_inactive", flag.to_string()));
        }
        if let Some(flag) = self.with_just_orders {
            params.push(("with_just_orders", flag.to_string()));
        }
        push_page_params(&mut params, self.max_page_size, &self.cursor)?;
        Ok(params)
    }
}

/// Filters for the deposit and withdrawal history endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub currency_code: Option<String>,
    pub max_page_size: Option<u32>,
    pub cursor: Option<String>,
}

impl TransferQuery {
    pub(crate) fn query_params(&self) -> Result<Vec<(&'static str, String)>> {
        let mut params = time_window_params(self.start, self.end);
        if let Some(code) = &self.currency_code {
            params.push(("currency_code", code.clone()));
        }
        push_page_params(&mut params, self.max_page_size, &self.cursor)?;
        Ok(params)
    }
}

fn time_window_params(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(start) = start {
        params.push(("from", format_timestamp(start)));
    }
    if let Some(end) = end {
        params.push(("to", format_timestamp(end)));
    }
    params
}

fn push_page_params(
    params: &mut Vec<(&'static str, String)>,
    max_page_size: Option<u32>,
    cursor: &Option<String>,
) -> Result<()> {
    if let Some(size) = max_page_size {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(Error::Validation(format!(
                "max_page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        params.push(("max_page_size", size.to_string()));
    }
    if let Some(cursor) = cursor {
        params.push(("cursor", cursor.clone()));
    }
    Ok(())
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
