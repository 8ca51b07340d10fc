use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::Observation;

#[derive(Debug, Clone)]
pub(crate) struct CsvSchema {
    /// Expected header, compared case-insensitively.
    pub(crate) columns: [&'static str; 3],
    pub(crate) min_months: usize,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self {
            columns: ["month", "category", "amount"],
            min_months: 3,
        }
    }
}

/// Validated input rows plus the facts derived from them.
///
/// Only `CsvImporter` builds one, so holding a `Dataset` means there is at
/// least one observation and at least `min_months` distinct months.
#[derive(Debug, Clone)]
pub(crate) struct Dataset {
    observations: Vec<Observation>,
    categories: BTreeSet<String>,
    months: BTreeSet<i64>,
    skipped: usize,
}

impl Dataset {
    pub(crate) fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub(crate) fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Distinct months, ascending.
    pub(crate) fn months(&self) -> &BTreeSet<i64> {
        &self.months
    }

    /// Rows dropped by the lenient rules (wrong field count, blank month or category).
    pub(crate) fn skipped(&self) -> usize {
        self.skipped
    }

    pub(crate) fn last_month(&self) -> Option<i64> {
        self.months.last().copied()
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read a CSV file from disk as UTF-8 text.
    pub(crate) fn read(path: &Path) -> Result<String> {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
        String::from_utf8(bytes)
            .with_context(|| format!("CSV file is not valid UTF-8: {}", path.display()))
    }

    pub(crate) fn validate(raw: &str) -> Result<Dataset, ValidationError> {
        Self::validate_with(raw, &CsvSchema::default())
    }

    pub(crate) fn validate_with(raw: &str, schema: &CsvSchema) -> Result<Dataset, ValidationError> {
        // Spreadsheet exports often lead with a byte-order mark
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(raw.as_bytes());
        let mut records = rdr.records();

        let header = records.next().ok_or(ValidationError::MissingHeader)??;
        check_header(&header, schema)?;

        let mut observations = Vec::new();
        let mut categories = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut skipped = 0;

        for result in records {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != schema.columns.len() {
                debug!(line, fields = record.len(), "skipping row with wrong field count");
                skipped += 1;
                continue;
            }

            let month_str = record[0].trim();
            let category = record[1].trim();
            let amount_str = record[2].trim();

            if category.is_empty() || month_str.is_empty() {
                debug!(line, "skipping row with blank month or category");
                skipped += 1;
                continue;
            }

            let (Ok(month), Some(amount)) = (month_str.parse::<i64>(), parse_amount(amount_str))
            else {
                return Err(ValidationError::InvalidRow {
                    line,
                    category: category.to_string(),
                    month: month_str.to_string(),
                    amount: amount_str.to_string(),
                });
            };

            months.insert(month);
            categories.insert(category.to_string());
            observations.push(Observation::new(month, category, amount));
        }

        if observations.is_empty() {
            return Err(ValidationError::NoData);
        }

        if months.len() < schema.min_months {
            return Err(ValidationError::InsufficientHistory {
                found: months.len(),
                required: schema.min_months,
            });
        }

        debug!(
            rows = observations.len(),
            skipped,
            months = months.len(),
            categories = categories.len(),
            "validated spending history"
        );

        Ok(Dataset {
            observations,
            categories,
            months,
            skipped,
        })
    }
}

fn check_header(header: &csv::StringRecord, schema: &CsvSchema) -> Result<(), ValidationError> {
    let matches = header.len() == schema.columns.len()
        && header
            .iter()
            .zip(schema.columns)
            .all(|(field, expected)| field.to_lowercase() == expected);

    if matches {
        Ok(())
    } else {
        Err(ValidationError::BadHeader {
            found: header.iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// Parse a plain or scientific-notation amount. Currency symbols,
/// separators and non-finite spellings are rejected.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    if let Ok(d) = Decimal::from_str(s) {
        return Some(d);
    }
    if s.contains(['e', 'E']) {
        return Decimal::from_scientific(s).ok();
    }
    None
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
