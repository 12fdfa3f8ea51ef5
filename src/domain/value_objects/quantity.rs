use crate::domain::errors::LedgerError;
use rust_decimal::Decimal;

/// A trade or cash-movement quantity. Strictly positive: zero-sized events
/// are rejected at the edge rather than silently recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Quantity(value))
        } else {
            Err(LedgerError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
