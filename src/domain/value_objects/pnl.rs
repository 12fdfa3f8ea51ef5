use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profit and Loss value object.
///
/// Unlike Price, PnL can be negative to represent losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pnl(Decimal);

impl Pnl {
    pub fn new(value: Decimal) -> Self {
        Pnl(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if this represents a profit (positive value)
    pub fn is_profit(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Check if this represents a loss (negative value)
    pub fn is_loss(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Create a zero PnL (breakeven)
    pub fn zero() -> Self {
        Pnl(Decimal::ZERO)
    }
}

impl std::fmt::Display for Pnl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= Decimal::ZERO {
            write!(f, "+${:.2}", self.0)
        } else {
            write!(f, "-${:.2}", self.0.abs())
        }
    }
}

impl std::ops::Add for Pnl {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Pnl(self.0 + other.0)
    }
}

impl std::ops::Sub for Pnl {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Pnl(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pnl_profit() {
        let pnl = Pnl::new(dec!(1000));
        assert_eq!(pnl.value(), dec!(1000));
        assert!(pnl.is_profit());
        assert!(!pnl.is_loss());
    }

    #[test]
    fn test_pnl_loss() {
        let pnl = Pnl::new(dec!(-500));
        assert_eq!(pnl.value(), dec!(-500));
        assert!(!pnl.is_profit());
        assert!(pnl.is_loss());
    }

    #[test]
    fn test_pnl_zero() {
        let pnl = Pnl::zero();
        assert_eq!(pnl.value(), Decimal::ZERO);
        assert!(!pnl.is_profit());
        assert!(!pnl.is_loss());
    }

    #[test]
    fn test_pnl_add() {
        let total = Pnl::new(dec!(1000)) + Pnl::new(dec!(-300));
        assert_eq!(total.value(), dec!(700));
    }

    #[test]
    fn test_pnl_sub() {
        let diff = Pnl::new(dec!(80)) - Pnl::new(dec!(100));
        assert_eq!(diff.value(), dec!(-20));
    }

    #[test]
    fn test_pnl_display() {
        assert_eq!(format!("{}", Pnl::new(dec!(1234.56))), "+$1234.56");
        assert_eq!(format!("{}", Pnl::new(dec!(-789.12))), "-$789.12");
    }
}
