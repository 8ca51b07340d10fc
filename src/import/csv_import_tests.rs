#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::ErrorKind;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

const BASIC: &str = "month,category,amount
1,Food,100
1,Rent,800
2,Food,120
2,Rent,800
3,Food,90
";

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_basic() {
    assert_eq!(parse_amount("100.50"), Some(dec!(100.50)));
    assert_eq!(parse_amount("-42.99"), Some(dec!(-42.99)));
    assert_eq!(parse_amount("42"), Some(dec!(42)));
}

#[test]
fn test_parse_amount_scientific() {
    assert_eq!(parse_amount("1.5e3"), Some(dec!(1500)));
}

#[test]
fn test_parse_amount_rejects_currency_and_separators() {
    assert_eq!(parse_amount("$12.00"), None);
    assert_eq!(parse_amount("1,200"), None);
}

#[test]
fn test_parse_amount_rejects_non_finite() {
    assert_eq!(parse_amount("nan"), None);
    assert_eq!(parse_amount("inf"), None);
    assert_eq!(parse_amount(""), None);
}

// ── header ────────────────────────────────────────────────────

#[test]
fn test_header_case_insensitive() {
    let csv = "MONTH,Category,AmOuNt\n1,Food,1\n2,Food,2\n3,Food,3\n";
    assert!(CsvImporter::validate(csv).is_ok());
}

#[test]
fn test_header_abbreviated_is_schema_error() {
    let csv = "Month,Cat,Amt\n1,Food,1\n2,Food,2\n3,Food,3\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("Month,Cat,Amt"));
}

#[test]
fn test_header_wrong_order_is_schema_error() {
    let csv = "category,month,amount\nFood,1,1\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert!(matches!(err, ValidationError::BadHeader { .. }));
}

#[test]
fn test_header_extra_column_is_schema_error() {
    let csv = "month,category,amount,note\n1,Food,1,x\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert!(matches!(err, ValidationError::BadHeader { .. }));
}

#[test]
fn test_header_padded_field_is_schema_error() {
    let csv = "month, category,amount\n1,Food,1\n2,Food,2\n3,Food,3\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_empty_input_is_missing_header() {
    let err = CsvImporter::validate("").unwrap_err();
    assert!(matches!(err, ValidationError::MissingHeader));
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let csv = format!("\u{feff}{BASIC}");
    let data = CsvImporter::validate(&csv).unwrap();
    assert_eq!(data.observations().len(), 5);
}

// ── rows ──────────────────────────────────────────────────────

#[test]
fn test_validate_basic() {
    let data = CsvImporter::validate(BASIC).unwrap();
    assert_eq!(data.observations().len(), 5);
    assert_eq!(data.skipped(), 0);
    assert_eq!(data.months().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(
        data.categories().iter().cloned().collect::<Vec<_>>(),
        vec!["Food".to_string(), "Rent".to_string()]
    );
    assert_eq!(data.last_month(), Some(3));
    assert_eq!(data.observations()[0], Observation::new(1, "Food", dec!(100)));
}

#[test]
fn test_fields_are_trimmed() {
    let csv = "month,category,amount\n 1 ,  Food , 10.5 \n2,Food,1\n3,Food,1\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.observations()[0], Observation::new(1, "Food", dec!(10.5)));
}

#[test]
fn test_short_and_long_rows_are_skipped() {
    let csv = "month,category,amount\n1,Food\n1,Food,10\n2,Food,20,extra\n2,Food,20\n3,Food,30\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.observations().len(), 3);
    assert_eq!(data.skipped(), 2);
}

#[test]
fn test_blank_month_or_category_is_skipped() {
    let csv = "month,category,amount\n,Food,10\n1,  ,10\n1,Food,10\n2,Food,20\n3,Food,30\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.observations().len(), 3);
    assert_eq!(data.skipped(), 2);
}

#[test]
fn test_blank_amount_is_hard_error() {
    let csv = "month,category,amount\n1,Food,\n2,Food,20\n3,Food,30\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_bad_month_aborts_with_raw_values() {
    let csv = "month,category,amount\n1,Food,10\nJan,Food,20\n3,Food,30\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    match &err {
        ValidationError::InvalidRow {
            line,
            category,
            month,
            amount,
        } => {
            assert_eq!(*line, 3);
            assert_eq!(category, "Food");
            assert_eq!(month, "Jan");
            assert_eq!(amount, "20");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err
        .to_string()
        .starts_with("Invalid month or amount for category Food: Jan, 20"));
}

#[test]
fn test_bad_amount_aborts() {
    let csv = "month,category,amount\n1,Food,ten\n2,Food,20\n3,Food,30\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidRow { .. }));
}

#[test]
fn test_fractional_month_aborts() {
    let csv = "month,category,amount\n1.5,Food,10\n2,Food,20\n3,Food,30\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_key_named_categories_accepted() {
    let csv = "month,category,amount\n1,savings,10\n2,month,20\n3,Food,30\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.observations().len(), 3);
    assert!(data.categories().contains("savings"));
    assert!(data.categories().contains("month"));
}

#[test]
fn test_quoted_fields() {
    let csv = "month,category,amount\n1,\"Food, Drink\",10\n2,\"Food, Drink\",20\n3,Rent,5\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert!(data.categories().contains("Food, Drink"));
}

#[test]
fn test_negative_and_large_months_allowed() {
    let csv = "month,category,amount\n-1,Food,10\n0,Food,20\n13,Food,30\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.last_month(), Some(13));
}

// ── data sufficiency ──────────────────────────────────────────

#[test]
fn test_header_only_is_no_data() {
    let err = CsvImporter::validate("month,category,amount\n").unwrap_err();
    assert!(matches!(err, ValidationError::NoData));
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[test]
fn test_all_rows_skipped_is_no_data() {
    let csv = "month,category,amount\n1,Food\n,Rent,3\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert!(matches!(err, ValidationError::NoData));
}

#[test]
fn test_two_months_is_insufficient_history() {
    let csv = "month,category,amount\n1,Food,10\n1,Rent,10\n2,Food,20\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    match err {
        ValidationError::InsufficientHistory { found, required } => {
            assert_eq!(found, 2);
            assert_eq!(required, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_insufficient_history_message_reports_count() {
    let csv = "month,category,amount\n5,Food,10\n";
    let err = CsvImporter::validate(csv).unwrap_err();
    assert_eq!(
        err.to_string(),
        "At least 3 months of data required, but only 1 months found"
    );
    assert_eq!(err.kind(), ErrorKind::InsufficientHistory);
}

#[test]
fn test_custom_min_months() {
    let schema = CsvSchema {
        min_months: 1,
        ..CsvSchema::default()
    };
    let csv = "month,category,amount\n5,Food,10\n";
    let data = CsvImporter::validate_with(csv, &schema).unwrap();
    assert_eq!(data.months().len(), 1);
}

#[test]
fn test_duplicate_rows_are_kept_separately() {
    let csv = "month,category,amount\n1,Food,10\n1,Food,5\n2,Food,20\n3,Food,30\n";
    let data = CsvImporter::validate(csv).unwrap();
    assert_eq!(data.observations().len(), 4);
    assert_eq!(data.months().len(), 3);
}

// ── read ──────────────────────────────────────────────────────

#[test]
fn test_read_file() {
    let file = make_csv_file(BASIC.as_bytes());
    let text = CsvImporter::read(file.path()).unwrap();
    assert_eq!(text, BASIC);
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvImporter::read(&dir.path().join("missing.csv")).unwrap_err();
    assert!(err.to_string().starts_with("File not found"));
}

#[test]
fn test_read_rejects_invalid_utf8() {
    let file = make_csv_file(b"month,category,amount\n1,\xff\xfe,10\n");
    let err = CsvImporter::read(file.path()).unwrap_err();
    assert!(err.to_string().contains("not valid UTF-8"));
}
