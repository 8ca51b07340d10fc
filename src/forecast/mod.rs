mod params;
mod trend;

pub(crate) use params::{ForecastParams, DEFAULT_FORECAST_MONTHS};
pub(crate) use trend::LinearTrend;

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{Error, ForecastError};
use crate::import::{CsvImporter, Dataset};
use crate::models::{Forecast, MonthKind, MonthSummary};

/// Per-category monthly totals, keyed by category then month.
type CategorySeries<'a> = BTreeMap<&'a str, BTreeMap<i64, Decimal>>;

/// Validate raw CSV text and project it forward.
pub(crate) fn forecast_csv(raw: &str, params: &ForecastParams) -> Result<Forecast, Error> {
    let dataset = CsvImporter::validate(raw)?;
    Ok(generate(&dataset, params)?)
}

/// Build the savings timeline: every historical month, then
/// `params.forecast_months()` predicted months after the last one.
pub(crate) fn generate(dataset: &Dataset, params: &ForecastParams) -> Result<Forecast, ForecastError> {
    let last = dataset.last_month().ok_or(ForecastError::EmptyHistory)?;
    let next = last
        .checked_add(1)
        .ok_or(ForecastError::MonthOverflow { last })?;

    let series = category_series(dataset)?;
    let horizon = params.forecast_months();
    let mut timeline = Vec::with_capacity(dataset.months().len() + horizon as usize);

    for &month in dataset.months() {
        let amounts: BTreeMap<String, Decimal> = series
            .iter()
            .filter_map(|(category, totals)| {
                totals
                    .get(&month)
                    .map(|amount| (category.to_string(), *amount))
            })
            .collect();
        timeline.push(summarize(month, amounts, params.income(), MonthKind::Historical)?);
    }

    let trends = fit_series(&series)?;
    for offset in 0..horizon {
        let month = next
            .checked_add(i64::from(offset))
            .ok_or(ForecastError::MonthOverflow { last })?;

        let mut amounts = BTreeMap::new();
        for (category, trend) in &trends {
            let amount = trend
                .predict_spend(month)
                .map_err(|source| ForecastError::Fit {
                    category: category.clone(),
                    source,
                })?;
            amounts.insert(category.clone(), amount);
        }
        timeline.push(summarize(month, amounts, params.income(), MonthKind::Predicted)?);
    }

    info!(
        categories = dataset.categories().len(),
        historical = dataset.months().len(),
        horizon,
        "generated forecast"
    );

    Ok(Forecast {
        categories: dataset.categories().iter().cloned().collect(),
        forecast: timeline,
    })
}

/// Fit one trend per category over its monthly totals.
pub(crate) fn fit_trends(dataset: &Dataset) -> Result<BTreeMap<String, LinearTrend>, ForecastError> {
    fit_series(&category_series(dataset)?)
}

fn fit_series(series: &CategorySeries<'_>) -> Result<BTreeMap<String, LinearTrend>, ForecastError> {
    let mut trends = BTreeMap::new();
    for (&category, totals) in series {
        let points: Vec<(i64, Decimal)> = totals.iter().map(|(m, a)| (*m, *a)).collect();
        let trend = LinearTrend::fit(&points).map_err(|source| ForecastError::Fit {
            category: category.to_string(),
            source,
        })?;
        debug!(
            category,
            points = trend.points(),
            slope = %trend.slope(),
            intercept = %trend.intercept(),
            "fitted spending trend"
        );
        trends.insert(category.to_string(), trend);
    }
    Ok(trends)
}

/// Sum observations sharing a (category, month) key. Months where a
/// category has no rows get no entry.
fn category_series(dataset: &Dataset) -> Result<CategorySeries<'_>, ForecastError> {
    let mut series: CategorySeries<'_> = BTreeMap::new();
    for obs in dataset.observations() {
        let total = series
            .entry(obs.category.as_str())
            .or_default()
            .entry(obs.month)
            .or_insert(Decimal::ZERO);
        *total = total
            .checked_add(obs.amount)
            .ok_or_else(|| ForecastError::AmountOverflow {
                category: obs.category.clone(),
                month: obs.month,
            })?;
    }
    Ok(series)
}

fn summarize(
    month: i64,
    amounts: BTreeMap<String, Decimal>,
    income: Decimal,
    kind: MonthKind,
) -> Result<MonthSummary, ForecastError> {
    let savings = amounts
        .values()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
        .and_then(|spend| income.checked_sub(spend))
        .ok_or(ForecastError::SavingsOverflow { month })?;

    Ok(MonthSummary {
        month,
        savings,
        amounts,
        kind,
    })
}

#[cfg(test)]
mod tests;
