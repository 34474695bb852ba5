/*
[INPUT]:  Wire schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for protocol communication
[UPDATE]: When the wire schema changes or new types are added
*/

use serde::{Deserialize, Serialize};

/// Aggregate status of a price feed as reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolStatus {
    Trading,
    Halted,
    Auction,
    #[serde(other)]
    Unknown,
}

impl SymbolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolStatus::Trading => "trading",
            SymbolStatus::Halted => "halted",
            SymbolStatus::Auction => "auction",
            SymbolStatus::Unknown => "unknown",
        }
    }
}

/// Kind of value a price account carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Price,
    #[serde(other)]
    Unknown,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Price => "price",
            PriceType::Unknown => "unknown",
        }
    }
}
