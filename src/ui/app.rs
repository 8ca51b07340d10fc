use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use crate::error::Error;
use crate::forecast::{self, ForecastParams, LinearTrend};
use crate::import::CsvImporter;
use crate::models::Forecast;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Timeline,
    Chart,
    Trends,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Timeline, Self::Chart, Self::Trends]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeline => write!(f, "Timeline"),
            Self::Chart => write!(f, "Chart"),
            Self::Trends => write!(f, "Trends"),
        }
    }
}

/// Everything derived from one read of the CSV file.
pub(crate) struct Snapshot {
    pub(crate) forecast: Forecast,
    pub(crate) trends: BTreeMap<String, LinearTrend>,
    pub(crate) skipped: usize,
}

impl Snapshot {
    pub(crate) fn from_csv(raw: &str, params: &ForecastParams) -> Result<Self, Error> {
        let dataset = CsvImporter::validate(raw)?;
        let forecast = forecast::generate(&dataset, params)?;
        let trends = forecast::fit_trends(&dataset)?;
        Ok(Self {
            forecast,
            trends,
            skipped: dataset.skipped(),
        })
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) visible_rows: usize,

    pub(crate) source: PathBuf,
    pub(crate) params: ForecastParams,
    pub(crate) snapshot: Snapshot,

    // Timeline
    pub(crate) month_index: usize,
    pub(crate) month_scroll: usize,

    // Trends
    pub(crate) trend_index: usize,
    pub(crate) trend_scroll: usize,
}

impl App {
    pub(crate) fn load(source: PathBuf, params: ForecastParams) -> Result<Self> {
        let raw = CsvImporter::read(&source)?;
        let snapshot =
            Snapshot::from_csv(&raw, &params).map_err(|e| anyhow::anyhow!(e.report()))?;

        let mut app = Self {
            running: true,
            screen: Screen::Timeline,
            status_message: String::new(),
            show_help: false,
            visible_rows: 20,
            source,
            params,
            snapshot,
            month_index: 0,
            month_scroll: 0,
            trend_index: 0,
            trend_scroll: 0,
        };
        app.set_status(app.summary_line());
        Ok(app)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn forecast(&self) -> &Forecast {
        &self.snapshot.forecast
    }

    /// Re-read the source file. On failure the previous forecast stays.
    pub(crate) fn reload(&mut self) {
        match self.recompute(self.params) {
            Ok(()) => {
                let msg = format!("Reloaded: {}", self.summary_line());
                self.set_status(msg);
            }
            Err(e) => {
                warn!(path = %self.source.display(), error = %e, "reload failed");
                self.set_status(format!("Reload failed: {e}"));
            }
        }
    }

    /// Lengthen or shorten the horizon by `delta` months and recompute.
    pub(crate) fn adjust_horizon(&mut self, delta: i64) {
        let months = i64::from(self.params.forecast_months()) + delta;
        let params = match self.params.with_forecast_months(months) {
            Ok(p) => p,
            Err(e) => {
                self.set_status(Error::from(e).report());
                return;
            }
        };
        match self.recompute(params) {
            Ok(()) => self.set_status(format!("Forecasting {months} months ahead")),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn recompute(&mut self, params: ForecastParams) -> Result<()> {
        let raw = CsvImporter::read(&self.source)?;
        let snapshot =
            Snapshot::from_csv(&raw, &params).map_err(|e| anyhow::anyhow!(e.report()))?;
        self.params = params;
        self.snapshot = snapshot;
        self.clamp_cursors();
        Ok(())
    }

    fn clamp_cursors(&mut self) {
        let months = self.snapshot.forecast.len();
        if self.month_index >= months {
            scroll_to_bottom(
                &mut self.month_index,
                &mut self.month_scroll,
                months,
                self.visible_rows,
            );
        }
        let trends = self.snapshot.trends.len();
        if self.trend_index >= trends {
            scroll_to_bottom(
                &mut self.trend_index,
                &mut self.trend_scroll,
                trends,
                self.visible_rows,
            );
        }
    }

    fn summary_line(&self) -> String {
        let forecast = &self.snapshot.forecast;
        format!(
            "{} months of history, {} categories, {} predicted, {} rows skipped",
            forecast.historical().count(),
            forecast.categories.len(),
            forecast.predicted().count(),
            self.snapshot.skipped
        )
    }

    pub(crate) fn move_down(&mut self) {
        let page = self.visible_rows.max(1);
        match self.screen {
            Screen::Timeline | Screen::Chart => {
                let len = self.snapshot.forecast.len();
                scroll_down(&mut self.month_index, &mut self.month_scroll, len, page);
            }
            Screen::Trends => {
                let len = self.snapshot.trends.len();
                scroll_down(&mut self.trend_index, &mut self.trend_scroll, len, page);
            }
        }
    }

    pub(crate) fn move_up(&mut self) {
        match self.screen {
            Screen::Timeline | Screen::Chart => {
                scroll_up(&mut self.month_index, &mut self.month_scroll)
            }
            Screen::Trends => scroll_up(&mut self.trend_index, &mut self.trend_scroll),
        }
    }

    pub(crate) fn goto_top(&mut self) {
        match self.screen {
            Screen::Timeline | Screen::Chart => {
                self.month_index = 0;
                self.month_scroll = 0;
            }
            Screen::Trends => {
                self.trend_index = 0;
                self.trend_scroll = 0;
            }
        }
    }

    pub(crate) fn goto_bottom(&mut self) {
        let page = self.visible_rows.max(1);
        match self.screen {
            Screen::Timeline | Screen::Chart => {
                let len = self.snapshot.forecast.len();
                scroll_to_bottom(&mut self.month_index, &mut self.month_scroll, len, page);
            }
            Screen::Trends => {
                let len = self.snapshot.trends.len();
                scroll_to_bottom(&mut self.trend_index, &mut self.trend_scroll, len, page);
            }
        }
    }

    pub(crate) fn next_screen(&mut self) {
        let screens = Screen::all();
        let idx = screens.iter().position(|s| *s == self.screen).unwrap_or(0);
        self.screen = screens[(idx + 1) % screens.len()];
    }

    pub(crate) fn prev_screen(&mut self) {
        let screens = Screen::all();
        let idx = screens.iter().position(|s| *s == self.screen).unwrap_or(0);
        self.screen = if idx == 0 {
            screens[screens.len() - 1]
        } else {
            screens[idx - 1]
        };
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
