use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::FitError;

/// Ordinary least-squares line through one category's monthly totals.
///
/// Months are shifted by an integer `pivot` near their mean before the sums
/// are taken, so large month indices stay well inside `Decimal` range and
/// integer inputs stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinearTrend {
    slope: Decimal,
    intercept: Decimal,
    pivot: i64,
    at_pivot: Decimal,
    points: usize,
}

impl LinearTrend {
    /// Fit `amount = slope * month + intercept` over `(month, amount)` pairs.
    ///
    /// Months are expected to be distinct. When every point shares one month
    /// the line is flat through the mean amount.
    pub(crate) fn fit(points: &[(i64, Decimal)]) -> Result<Self, FitError> {
        if points.is_empty() {
            return Err(FitError::Empty);
        }

        let count = i128::try_from(points.len()).map_err(|_| FitError::Overflow)?;
        let month_sum: i128 = points.iter().map(|&(month, _)| i128::from(month)).sum();
        let pivot = i64::try_from(month_sum / count).map_err(|_| FitError::Overflow)?;

        let n = Decimal::from(points.len());
        let mut sum_x = Decimal::ZERO;
        let mut sum_y = Decimal::ZERO;
        let mut sum_xx = Decimal::ZERO;
        let mut sum_xy = Decimal::ZERO;

        for &(month, amount) in points {
            let x = offset(month, pivot)?;
            sum_x = checked(sum_x.checked_add(x))?;
            sum_y = checked(sum_y.checked_add(amount))?;
            sum_xx = checked(sum_xx.checked_add(checked(x.checked_mul(x))?))?;
            sum_xy = checked(sum_xy.checked_add(checked(x.checked_mul(amount))?))?;
        }

        // n·Σx² − (Σx)², zero only when all months coincide
        let denom = checked(
            checked(n.checked_mul(sum_xx))?.checked_sub(checked(sum_x.checked_mul(sum_x))?),
        )?;

        let slope = if denom.is_zero() {
            Decimal::ZERO
        } else {
            let numer = checked(
                checked(n.checked_mul(sum_xy))?.checked_sub(checked(sum_x.checked_mul(sum_y))?),
            )?;
            checked(numer.checked_div(denom))?
        };

        let at_pivot = checked(
            checked(sum_y.checked_sub(checked(slope.checked_mul(sum_x))?))?.checked_div(n),
        )?;
        let intercept =
            checked(at_pivot.checked_sub(checked(slope.checked_mul(Decimal::from(pivot)))?))?;

        Ok(Self {
            slope,
            intercept,
            pivot,
            at_pivot,
            points: points.len(),
        })
    }

    pub(crate) fn predict(&self, month: i64) -> Result<Decimal, FitError> {
        let x = offset(month, self.pivot)?;
        checked(checked(self.slope.checked_mul(x))?.checked_add(self.at_pivot))
    }

    /// Prediction floored at zero; spend is never projected negative.
    pub(crate) fn predict_spend(&self, month: i64) -> Result<Decimal, FitError> {
        Ok(self.predict(month)?.max(Decimal::ZERO))
    }

    pub(crate) fn slope(&self) -> Decimal {
        self.slope
    }

    /// Value of the line at month 0.
    pub(crate) fn intercept(&self) -> Decimal {
        self.intercept
    }

    pub(crate) fn points(&self) -> usize {
        self.points
    }
}

fn offset(month: i64, pivot: i64) -> Result<Decimal, FitError> {
    checked(Decimal::from_i128(i128::from(month) - i128::from(pivot)))
}

fn checked(value: Option<Decimal>) -> Result<Decimal, FitError> {
    value.ok_or(FitError::Overflow)
}

#[cfg(test)]
#[path = "trend_tests.rs"]
mod tests;
