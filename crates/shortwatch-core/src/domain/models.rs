use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Short-interest snapshot for one symbol.
///
/// Every metric is optional because the upstream lookup may omit any of them;
/// a missing field is `None`, never a silent zero. Filtering and ranking key
/// off presence, so the distinction is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortInterest {
    pub symbol: Symbol,
    pub price: Option<f64>,
    pub short_ratio: Option<f64>,
    /// Fraction of float shorted, in natural units (0.42 = 42%).
    pub short_percent_of_float: Option<f64>,
    pub float_shares: Option<u64>,
    pub market_cap: Option<u64>,
}

impl ShortInterest {
    pub fn new(
        symbol: Symbol,
        price: Option<f64>,
        short_ratio: Option<f64>,
        short_percent_of_float: Option<f64>,
        float_shares: Option<u64>,
        market_cap: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_optional_non_negative("price", price)?;
        validate_optional_non_negative("short_ratio", short_ratio)?;
        validate_optional_non_negative("short_percent_of_float", short_percent_of_float)?;

        Ok(Self {
            symbol,
            price,
            short_ratio,
            short_percent_of_float,
            float_shares,
            market_cap,
        })
    }

    /// Record with a symbol and no metrics at all.
    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            price: None,
            short_ratio: None,
            short_percent_of_float: None,
            float_shares: None,
            market_cap: None,
        }
    }
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeValue { field });
        }
    }
    Ok(())
}
