/*
[INPUT]:  Oracle service schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for oracle payloads
[UPDATE]: When the service schema changes or new types are added
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{PriceType, SymbolStatus};

/// One product returned by `get_product_list`.
///
/// `attr_dict` is free-form product metadata; the dashboard reads `symbol`,
/// `asset_type`, `country`, `quote_currency`, `tenor` and `description` but
/// the service may publish more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub account: String,
    #[serde(default)]
    pub attr_dict: BTreeMap<String, String>,
    #[serde(default)]
    pub price: Vec<PriceAccountEntry>,
}

impl ProductEntry {
    /// Attribute lookup with an empty-string default for absent keys.
    pub fn attr(&self, key: &str) -> &str {
        self.attr_dict.get(key).map(String::as_str).unwrap_or("")
    }
}

/// One price account under a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAccountEntry {
    pub account: String,
    pub price_exponent: i32,
    pub price_type: PriceType,
}

/// Acknowledgement result of a `subscribe_price` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeAck {
    pub subscription: u64,
}

/// One price notification payload. Mantissas are raw integers; the
/// per-symbol exponent from the product list scales them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub price: i64,
    pub conf: i64,
    #[serde(default)]
    pub twap: Option<i64>,
    #[serde(default)]
    pub twac: Option<i64>,
    pub status: SymbolStatus,
    pub valid_slot: u64,
    pub pub_slot: u64,
}

/// A price update projected into display values for the rendering sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFields {
    pub price: Decimal,
    pub conf: Decimal,
    pub twap: Option<Decimal>,
    pub twac: Option<Decimal>,
    pub status: SymbolStatus,
    pub valid_slot: u64,
    pub pub_slot: u64,
}
