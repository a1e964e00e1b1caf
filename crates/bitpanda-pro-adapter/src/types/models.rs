/*
[INPUT]:  Exchange JSON payloads and serde requirements
[OUTPUT]: Typed Rust domain value objects
[POS]:    Data layer - response-side models
[UPDATE]: When API schema changes or new types added
*/

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CurrencyKind, Side};

/// A currency listed on the exchange. Codes are canonicalized to uppercase
/// on construction; identity is code (and kind where distinguished).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "CurrencyWire")]
pub struct Currency {
    pub code: String,
    pub precision: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CurrencyKind>,
}

#[derive(Deserialize)]
struct CurrencyWire {
    code: String,
    precision: u32,
    #[serde(default)]
    kind: Option<CurrencyKind>,
}

impl From<CurrencyWire> for Currency {
    fn from(wire: CurrencyWire) -> Self {
        Currency {
            code: wire.code.to_uppercase(),
            precision: wire.precision,
            kind: wire.kind,
        }
    }
}

impl Currency {
    pub fn new(code: impl Into<String>, precision: u32) -> Self {
        Self {
            code: code.into().to_uppercase(),
            precision,
            kind: None,
        }
    }

    pub fn crypto(code: impl Into<String>, precision: u32) -> Self {
        Self {
            kind: Some(CurrencyKind::Crypto),
            ..Self::new(code, precision)
        }
    }

    pub fn fiat(code: impl Into<String>, precision: u32) -> Self {
        Self {
            kind: Some(CurrencyKind::Fiat),
            ..Self::new(code, precision)
        }
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.kind == other.kind
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// A per-currency balance. Identity is the wallet id alone; refreshed
/// snapshots replace older ones with the same id (last write wins).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(rename = "account_id")]
    pub id: Uuid,
    pub currency_code: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub change: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
    pub sequence: i64,
    pub time: DateTime<Utc>,
}

impl PartialEq for Wallet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Wallet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Account balances as returned by `GET /account/balances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "account_id")]
    pub id: Uuid,
    #[serde(rename = "balances")]
    pub wallets: HashSet<Wallet>,
}

/// A cleared deposit from the transfer history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transfer_type: String,
    pub funds_source: String,
    pub time: DateTime<Utc>,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee_amount: Decimal,
    pub fee_currency: String,
}

/// A cleared withdrawal from the transfer history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transfer_type: String,
    pub time: DateTime<Utc>,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee_amount: Decimal,
    pub fee_currency: String,
}

/// Destination of a crypto withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<String>,
}

impl Recipient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            destination_tag: None,
        }
    }

    pub fn with_destination_tag(address: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            destination_tag: Some(tag.into()),
        }
    }
}

/// Acknowledgement of a crypto withdrawal request. The wire format is flat
/// (`recipient` and `destination_tag` side by side); folded into a
/// [`Recipient`] here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CryptoWithdrawWire")]
pub struct CryptoWithdraw {
    pub amount: Decimal,
    pub fee: Decimal,
    pub recipient: Recipient,
    pub transaction_id: Uuid,
}

#[derive(Deserialize)]
struct CryptoWithdrawWire {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    fee: Decimal,
    recipient: String,
    #[serde(default)]
    destination_tag: Option<String>,
    transaction_id: Uuid,
}

impl From<CryptoWithdrawWire> for CryptoWithdraw {
    fn from(wire: CryptoWithdrawWire) -> Self {
        CryptoWithdraw {
            amount: wire.amount,
            fee: wire.fee,
            recipient: Recipient {
                address: wire.recipient,
                destination_tag: wire.destination_tag.filter(|tag| !tag.is_empty()),
            },
            transaction_id: wire.transaction_id,
        }
    }
}

/// A single fill reported with order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: Uuid,
    pub order_id: Uuid,
    pub account_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub side: Side,
    pub instrument_code: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub time: DateTime<Utc>,
    pub sequence: i64,
}

/// Fee charged for a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(with = "rust_decimal::serde::str")]
    pub fee_amount: Decimal,
    pub fee_currency: String,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_percentage: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<String>,
}

/// A tradeable market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub state: String,
    pub base: InstrumentCurrency,
    pub quote: InstrumentCurrency,
    pub amount_precision: u32,
    pub market_precision: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub min_size: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentCurrency {
    pub code: String,
}

/// Current exchange server time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTime {
    pub iso: String,
    pub epoch_millis: i64,
}

/// One tier of a fee group; applies once the running volume reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_group_id: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub maker_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub taker_fee: Decimal,
}

/// General fee group from the public `GET /fees` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeGroup {
    pub fee_group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    pub fee_tiers: Vec<FeeTier>,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_discount_rate: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_price_value: Option<Decimal>,
}

/// Account-specific fee settings, including the BEST collection toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountFees {
    pub account_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub running_trading_volume: Decimal,
    pub fee_group_id: String,
    pub collect_fees_in_best: bool,
    pub fee_tiers: Vec<FeeTier>,
    pub active_fee_tier: FeeTier,
}

/// Deposit address for a crypto currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_smart_contract: Option<bool>,
}

/// SEPA transfer details for fiat deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SepaDepositInfo {
    pub iban: String,
    pub bic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
