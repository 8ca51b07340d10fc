use rust_decimal::Decimal;

use crate::error::ParamError;
use crate::import::parse_amount;

pub(crate) const DEFAULT_FORECAST_MONTHS: i64 = 3;

/// One hundred years of monthly predictions.
pub(crate) const MAX_FORECAST_MONTHS: u32 = 1200;

/// Income and horizon, checked before any CSV parsing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ForecastParams {
    income: Decimal,
    forecast_months: u32,
}

impl ForecastParams {
    pub(crate) fn new(income: Decimal, forecast_months: i64) -> Result<Self, ParamError> {
        if income <= Decimal::ZERO {
            return Err(ParamError::NonPositiveIncome(income));
        }
        if forecast_months <= 0 {
            return Err(ParamError::NonPositiveHorizon(forecast_months));
        }
        let forecast_months = u32::try_from(forecast_months)
            .ok()
            .filter(|&months| months <= MAX_FORECAST_MONTHS)
            .ok_or(ParamError::HorizonTooLarge {
                found: forecast_months,
                max: MAX_FORECAST_MONTHS,
            })?;
        Ok(Self {
            income,
            forecast_months,
        })
    }

    /// Build from raw caller strings. A missing horizon falls back to `default_months`.
    pub(crate) fn parse(
        income: Option<&str>,
        forecast_months: Option<&str>,
        default_months: i64,
    ) -> Result<Self, ParamError> {
        let income = income.map(str::trim).ok_or(ParamError::MissingIncome)?;
        let income =
            parse_amount(income).ok_or_else(|| ParamError::InvalidIncome(income.to_string()))?;

        let months = match forecast_months.map(str::trim) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ParamError::InvalidHorizon(raw.to_string()))?,
            None => default_months,
        };

        Self::new(income, months)
    }

    pub(crate) fn with_forecast_months(&self, forecast_months: i64) -> Result<Self, ParamError> {
        Self::new(self.income, forecast_months)
    }

    pub(crate) fn income(&self) -> Decimal {
        self.income
    }

    pub(crate) fn forecast_months(&self) -> u32 {
        self.forecast_months
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
