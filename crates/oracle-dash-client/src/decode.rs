/*
[INPUT]:  Integer mantissas plus per-symbol decimal exponents
[OUTPUT]: Exact Decimal values with display scale equal to |exponent|
[POS]:    Projection layer - numeric decoding for the rendering sink
[UPDATE]: When the supported exponent range changes
*/

use rust_decimal::Decimal;

use crate::error::{OracleError, Result};
use crate::types::{PriceFields, PriceUpdate};

/// Largest exponent magnitude the scaling table covers. Mirrors the range
/// of exponents the oracle actually publishes; anything outside it is a
/// decode error, never a silent truncation.
pub const MAX_EXPONENT_MAGNITUDE: u32 = 10;

/// The negative power of ten selected by an exponent, or an error when the
/// exponent falls outside the supported table.
pub fn scale_factor(price_exponent: i32) -> Result<Decimal> {
    check_exponent(price_exponent)?;
    Ok(Decimal::new(1, price_exponent.unsigned_abs()))
}

/// Scale a raw mantissa by `10^price_exponent`.
///
/// The result keeps a decimal scale of `|price_exponent|`, so mantissa
/// 868725 at exponent -5 displays as "8.68725".
pub fn scaled(mantissa: i64, price_exponent: i32) -> Result<Decimal> {
    check_exponent(price_exponent)?;
    Ok(Decimal::new(mantissa, price_exponent.unsigned_abs()))
}

fn check_exponent(price_exponent: i32) -> Result<()> {
    if price_exponent > 0 || price_exponent.unsigned_abs() > MAX_EXPONENT_MAGNITUDE {
        return Err(OracleError::ExponentOutOfRange {
            exponent: price_exponent,
        });
    }
    Ok(())
}

impl PriceUpdate {
    /// Project raw mantissas into display values using the per-symbol
    /// exponent. Status and slot fields pass through unmodified.
    pub fn project(&self, price_exponent: i32) -> Result<PriceFields> {
        Ok(PriceFields {
            price: scaled(self.price, price_exponent)?,
            conf: scaled(self.conf, price_exponent)?,
            twap: self
                .twap
                .map(|twap| scaled(twap, price_exponent))
                .transpose()?,
            twac: self
                .twac
                .map(|twac| scaled(twac, price_exponent))
                .transpose()?,
            status: self.status,
            valid_slot: self.valid_slot,
            pub_slot: self.pub_slot,
        })
    }
}
