use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Keys every serialized month carries before its category amounts.
pub const SUMMARY_KEYS: [&str; 2] = ["month", "savings"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthKind {
    Historical,
    Predicted,
}

impl MonthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Historical => "Actual",
            Self::Predicted => "Forecast",
        }
    }
}

impl std::fmt::Display for MonthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Savings plus per-category spend for one month of the timeline.
///
/// `amounts` is sparse: a category with no observations in a historical
/// month is left out entirely rather than stored as zero.
///
/// Serializes as one flat object. A category named like one of
/// [`SUMMARY_KEYS`] still counts toward `savings` but is left out of the
/// object, so `month` and `savings` keep their meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: i64,
    pub savings: Decimal,
    pub amounts: BTreeMap<String, Decimal>,
    pub kind: MonthKind,
}

impl Serialize for MonthSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let amounts: Vec<_> = self
            .amounts
            .iter()
            .filter(|(name, _)| !SUMMARY_KEYS.contains(&name.as_str()))
            .collect();

        let mut map = serializer.serialize_map(Some(amounts.len() + SUMMARY_KEYS.len()))?;
        map.serialize_entry("month", &self.month)?;
        map.serialize_entry("savings", &self.savings)?;
        for (name, amount) in amounts {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl MonthSummary {
    pub fn amount(&self, category: &str) -> Option<Decimal> {
        self.amounts.get(category).copied()
    }

    pub fn total_spend(&self) -> Decimal {
        self.amounts.values().copied().sum()
    }

    pub fn is_predicted(&self) -> bool {
        self.kind == MonthKind::Predicted
    }
}

/// Engine output: the category list and the full month timeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Forecast {
    pub categories: Vec<String>,
    pub forecast: Vec<MonthSummary>,
}

impl Forecast {
    pub fn historical(&self) -> impl Iterator<Item = &MonthSummary> {
        self.forecast.iter().filter(|m| !m.is_predicted())
    }

    pub fn predicted(&self) -> impl Iterator<Item = &MonthSummary> {
        self.forecast.iter().filter(|m| m.is_predicted())
    }

    pub fn len(&self) -> usize {
        self.forecast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast.is_empty()
    }

    /// Categories whose amounts are hidden from the serialized months.
    pub fn shadowed_categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(String::as_str)
            .filter(|name| SUMMARY_KEYS.contains(name))
    }
}
