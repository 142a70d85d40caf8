//! Shared query parameter types for API handlers.

use planpm_core::error::CoreError;
use planpm_core::summary::SummaryWindow;
use planpm_core::types::DbId;
use serde::Deserialize;

/// `?search=` free-text filter.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// `?window=30|90` for the summary endpoints. Defaults to 30 days.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub window: Option<i64>,
}

impl WindowParams {
    pub fn window(&self) -> Result<SummaryWindow, CoreError> {
        match self.window {
            Some(days) => SummaryWindow::from_days(days),
            None => Ok(SummaryWindow::default()),
        }
    }
}

/// `?instrument_id=` filter for schedule listings.
#[derive(Debug, Default, Deserialize)]
pub struct InstrumentFilter {
    pub instrument_id: Option<DbId>,
}

/// `?username=` for the public role lookup.
#[derive(Debug, Deserialize)]
pub struct UsernameParams {
    pub username: String,
}
