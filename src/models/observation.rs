use rust_decimal::Decimal;

/// One validated `month,category,amount` input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Plain integer month index; no calendar semantics.
    pub month: i64,
    pub category: String,
    pub amount: Decimal,
}

impl Observation {
    pub fn new(month: i64, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            month,
            category: category.into(),
            amount,
        }
    }
}
