mod observation;
mod summary;

pub use observation::Observation;
pub use summary::{Forecast, MonthKind, MonthSummary};
