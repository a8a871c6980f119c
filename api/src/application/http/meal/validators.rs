use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

/// Viewer timezone used to decide where "today" starts.
#[derive(Debug, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewerTimezone {
    /// Offset from UTC in minutes, e.g. 540 for UTC+09:00. Defaults to the
    /// server's local offset.
    #[validate(range(min = -720, max = 840, message = "utc_offset_minutes must be between -720 and 840"))]
    pub utc_offset_minutes: Option<i32>,
}

impl ViewerTimezone {
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| *Local::now().offset())
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset())
    }
}
