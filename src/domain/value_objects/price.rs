use crate::domain::errors::LedgerError;
use rust_decimal::Decimal;

/// A per-share price. Zero is allowed (delisted or worthless instruments),
/// negative is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value >= Decimal::ZERO {
            Ok(Price(value))
        } else {
            Err(LedgerError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_new_valid() {
        let price = Price::new(dec!(100.50));
        assert!(price.is_ok());
        assert_eq!(price.unwrap().value(), dec!(100.50));
    }

    #[test]
    fn test_price_new_negative() {
        let price = Price::new(dec!(-10));
        assert_eq!(price.unwrap_err(), LedgerError::InvalidAmount);
    }

    #[test]
    fn test_price_new_zero() {
        let price = Price::new(Decimal::ZERO);
        assert!(price.is_ok());
        assert_eq!(price.unwrap().value(), Decimal::ZERO);
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(dec!(99.9)).unwrap();
        assert_eq!(format!("{}", price), "$99.90");
    }
}
