use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of a failed forecast request.
///
/// Hosts map these onto their own status codes; everything but
/// `Computation` is the caller's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    Schema,
    InsufficientHistory,
    NoData,
    Parse,
    InvalidParameter,
    Computation,
}

impl ErrorKind {
    pub(crate) fn is_client_error(self) -> bool {
        !matches!(self, Self::Computation)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema => write!(f, "schema error"),
            Self::InsufficientHistory => write!(f, "insufficient history"),
            Self::NoData => write!(f, "no data"),
            Self::Parse => write!(f, "parse error"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::Computation => write!(f, "computation error"),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ValidationError {
    #[error("CSV input is empty; expected headers: month,category,amount")]
    MissingHeader,

    #[error("CSV file must have headers: month,category,amount (found: {})", .found.join(","))]
    BadHeader { found: Vec<String> },

    #[error("Invalid month or amount for category {category}: {month}, {amount} (line {line})")]
    InvalidRow {
        line: u64,
        category: String,
        month: String,
        amount: String,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No valid data found in CSV file")]
    NoData,

    #[error("At least {required} months of data required, but only {found} months found")]
    InsufficientHistory { found: usize, required: usize },
}

impl ValidationError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingHeader | Self::BadHeader { .. } => ErrorKind::Schema,
            Self::InvalidRow { .. } | Self::Csv(_) => ErrorKind::Parse,
            Self::NoData => ErrorKind::NoData,
            Self::InsufficientHistory { .. } => ErrorKind::InsufficientHistory,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ParamError {
    #[error("Monthly income is required")]
    MissingIncome,

    #[error("Income must be a valid number, got '{0}'")]
    InvalidIncome(String),

    #[error("Income must be a positive number, got {0}")]
    NonPositiveIncome(Decimal),

    #[error("Forecast months must be a valid number, got '{0}'")]
    InvalidHorizon(String),

    #[error("Forecast months must be a positive number, got {0}")]
    NonPositiveHorizon(i64),

    #[error("Forecast months must be at most {max}, got {found}")]
    HorizonTooLarge { found: i64, max: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum FitError {
    #[error("no data points to fit")]
    Empty,

    #[error("arithmetic overflow while fitting trend")]
    Overflow,
}

#[derive(Debug, Error)]
pub(crate) enum ForecastError {
    #[error("Cannot fit spending trend for category '{category}': {source}")]
    Fit {
        category: String,
        #[source]
        source: FitError,
    },

    #[error("Amount overflow summing category '{category}' in month {month}")]
    AmountOverflow { category: String, month: i64 },

    #[error("Savings overflow in month {month}")]
    SavingsOverflow { month: i64 },

    #[error("Month index overflows after month {last}")]
    MonthOverflow { last: i64 },

    #[error("No historical months to forecast from")]
    EmptyHistory,
}

/// Any failure the forecast boundary can report.
#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl Error {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Params(_) => ErrorKind::InvalidParameter,
            Self::Forecast(_) => ErrorKind::Computation,
        }
    }

    /// Message prefixed with its classification, e.g. `[no data] ...`.
    pub(crate) fn report(&self) -> String {
        format!("[{}] {self}", self.kind())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
