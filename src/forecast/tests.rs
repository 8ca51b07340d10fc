#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::ErrorKind;
use rust_decimal_macros::dec;

const HISTORY: &str = "month,category,amount
1,Food,100
1,Rent,800
2,Food,120
2,Rent,800
3,Food,140
3,Rent,800
3,Fun,60
";

fn params(income: Decimal, months: i64) -> ForecastParams {
    ForecastParams::new(income, months).unwrap()
}

fn dataset(csv: &str) -> Dataset {
    CsvImporter::validate(csv).unwrap()
}

fn months_of(forecast: &Forecast) -> Vec<i64> {
    forecast.forecast.iter().map(|m| m.month).collect()
}

// ── timeline shape ────────────────────────────────────────────

#[test]
fn test_length_is_history_plus_horizon() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 4)).unwrap();
    assert_eq!(forecast.len(), 3 + 4);
    assert_eq!(forecast.historical().count(), 3);
    assert_eq!(forecast.predicted().count(), 4);
}

#[test]
fn test_months_ascending_without_gaps() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 3)).unwrap();
    assert_eq!(months_of(&forecast), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_historical_months_keep_input_gaps() {
    let csv = "month,category,amount\n7,Food,10\n2,Food,20\n4,Food,30\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 2)).unwrap();
    assert_eq!(months_of(&forecast), vec![2, 4, 7, 8, 9]);
}

#[test]
fn test_month_thirteen_is_just_an_integer() {
    let csv = "month,category,amount\n11,Food,10\n12,Food,10\n13,Food,10\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 1)).unwrap();
    assert_eq!(months_of(&forecast), vec![11, 12, 13, 14]);
}

#[test]
fn test_categories_sorted() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 1)).unwrap();
    assert_eq!(forecast.categories, vec!["Food", "Fun", "Rent"]);
}

// ── historical pass ───────────────────────────────────────────

#[test]
fn test_historical_savings_identity() {
    let income = dec!(2000);
    let forecast = generate(&dataset(HISTORY), &params(income, 2)).unwrap();
    for month in forecast.historical() {
        assert_eq!(month.savings, income - month.total_spend());
    }
    assert_eq!(forecast.forecast[0].savings, dec!(1100));
    assert_eq!(forecast.forecast[2].savings, dec!(1000));
}

#[test]
fn test_absent_category_omitted_from_historical_month() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 1)).unwrap();
    let first = &forecast.forecast[0];
    assert_eq!(first.amount("Fun"), None);
    assert_eq!(first.amounts.len(), 2);
    assert_eq!(forecast.forecast[2].amount("Fun"), Some(dec!(60)));
}

#[test]
fn test_duplicate_rows_are_summed() {
    let csv = "month,category,amount\n1,Food,10\n1,Food,15\n2,Food,30\n3,Food,40\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 1)).unwrap();
    assert_eq!(forecast.forecast[0].amount("Food"), Some(dec!(25)));
    assert_eq!(forecast.forecast[0].savings, dec!(75));
}

#[test]
fn test_zero_sum_category_is_present() {
    let csv = "month,category,amount\n1,Refund,5\n1,Refund,-5\n2,Food,1\n3,Food,1\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 1)).unwrap();
    assert_eq!(forecast.forecast[0].amount("Refund"), Some(Decimal::ZERO));
}

// ── future pass ───────────────────────────────────────────────

#[test]
fn test_linear_category_extrapolates() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 2)).unwrap();
    let predicted: Vec<&MonthSummary> = forecast.predicted().collect();
    assert_eq!(predicted[0].amount("Food"), Some(dec!(160)));
    assert_eq!(predicted[1].amount("Food"), Some(dec!(180)));
    assert_eq!(predicted[0].amount("Rent"), Some(dec!(800)));
}

#[test]
fn test_single_point_category_is_constant() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(2000), 3)).unwrap();
    for month in forecast.predicted() {
        assert_eq!(month.amount("Fun"), Some(dec!(60)));
    }
}

#[test]
fn test_two_point_category_predicts_exactly() {
    let csv = "month,category,amount\n1,Food,10\n2,Food,20\n3,Rent,5\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 1)).unwrap();
    let future = forecast.predicted().next().unwrap();
    assert_eq!(future.month, 4);
    // Food: y = 10x, evaluated at month 4
    assert_eq!(future.amount("Food"), Some(dec!(40)));
    assert_eq!(future.amount("Rent"), Some(dec!(5)));
    assert_eq!(future.savings, dec!(55));
}

#[test]
fn test_ten_twenty_predicts_thirty_at_month_three() {
    let trend = LinearTrend::fit(&[(1, dec!(10)), (2, dec!(20))]).unwrap();
    assert_eq!(trend.predict_spend(3).unwrap(), dec!(30));
}

#[test]
fn test_declining_category_is_clamped() {
    let csv = "month,category,amount\n1,Gym,90\n2,Gym,50\n3,Gym,10\n";
    let forecast = generate(&dataset(csv), &params(dec!(100), 3)).unwrap();
    let predicted: Vec<&MonthSummary> = forecast.predicted().collect();
    assert_eq!(predicted[0].amount("Gym"), Some(Decimal::ZERO));
    for month in &predicted {
        assert!(month.amounts.values().all(|a| *a >= Decimal::ZERO));
        assert_eq!(month.savings, dec!(100));
    }
}

#[test]
fn test_predicted_savings_identity() {
    let income = dec!(1234.56);
    let forecast = generate(&dataset(HISTORY), &params(income, 5)).unwrap();
    for month in forecast.predicted() {
        assert_eq!(month.savings, income - month.total_spend());
        assert_eq!(month.amounts.len(), 3);
    }
}

#[test]
fn test_negative_savings_allowed() {
    let forecast = generate(&dataset(HISTORY), &params(dec!(500), 1)).unwrap();
    assert!(forecast.forecast.iter().all(|m| m.savings < Decimal::ZERO));
}

#[test]
fn test_fit_trends_one_per_category() {
    let trends = fit_trends(&dataset(HISTORY)).unwrap();
    assert_eq!(trends.len(), 3);
    assert_eq!(trends["Food"].slope(), dec!(20));
    assert_eq!(trends["Food"].points(), 3);
    assert_eq!(trends["Fun"].points(), 1);
}

#[test]
fn test_category_named_savings_is_forecast() {
    let csv = "month,category,amount\n1,savings,100\n2,savings,100\n3,savings,100\n3,Food,50\n";
    let forecast = forecast_csv(csv, &params(dec!(1000), 1)).unwrap();
    assert_eq!(forecast.categories, ["Food", "savings"]);

    let third = &forecast.forecast[2];
    assert_eq!(third.amount("savings"), Some(dec!(100)));
    assert_eq!(third.savings, dec!(850));

    let next = forecast.predicted().next().unwrap();
    assert_eq!(next.amount("savings"), Some(dec!(100)));
    assert_eq!(next.total_spend(), dec!(150));
    assert_eq!(next.savings, dec!(850));
}

// ── determinism ───────────────────────────────────────────────

#[test]
fn test_repeat_runs_are_identical() {
    let p = params(dec!(2000), 6);
    let first = forecast_csv(HISTORY, &p).unwrap();
    let second = forecast_csv(HISTORY, &p).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ── errors ────────────────────────────────────────────────────

#[test]
fn test_two_months_never_forecast() {
    let csv = "month,category,amount\n1,Food,10\n2,Food,20\n";
    let err = forecast_csv(csv, &params(dec!(100), 3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientHistory);
}

#[test]
fn test_bad_header_is_schema_error() {
    let csv = "Month,Cat,Amt\n1,Food,10\n2,Food,20\n3,Food,30\n";
    let err = forecast_csv(csv, &params(dec!(100), 3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_month_overflow_is_reported() {
    let max = i64::MAX;
    let csv = format!(
        "month,category,amount\n{},Food,1\n{},Food,1\n{max},Food,1\n",
        max - 2,
        max - 1
    );
    let err = forecast_csv(&csv, &params(dec!(100), 1)).unwrap_err();
    assert!(matches!(
        err,
        Error::Forecast(ForecastError::MonthOverflow { last }) if last == max
    ));
    assert_eq!(err.kind(), ErrorKind::Computation);
}

#[test]
fn test_months_near_i64_max_forecast() {
    let max = i64::MAX - 1;
    let csv = format!(
        "month,category,amount\n{},Food,1\n{},Food,2\n{max},Food,3\n",
        max - 2,
        max - 1
    );
    let forecast = forecast_csv(&csv, &params(dec!(100), 1)).unwrap();
    let next = forecast.predicted().next().unwrap();
    assert_eq!(next.month, i64::MAX);
    assert_eq!(next.amount("Food"), Some(dec!(4)));
}

#[test]
fn test_fit_overflow_is_reported() {
    let huge = "50000000000000000000000000000";
    let csv = format!("month,category,amount\n1,Food,{huge}\n2,Food,{huge}\n3,Food,{huge}\n");
    let err = forecast_csv(&csv, &params(dec!(100), 1)).unwrap_err();
    assert!(matches!(
        err,
        Error::Forecast(ForecastError::Fit { ref category, .. }) if category == "Food"
    ));
}
