use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};

use crate::domain::meal::entities::MealRecord;

use super::entities::NutrientVector;

/// Local midnight of the day `now` falls on, expressed in UTC.
pub fn start_of_day(now: &DateTime<FixedOffset>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Sum of every record logged since local midnight. Records may come in any
/// order.
pub fn daily_totals(records: &[MealRecord], now: &DateTime<FixedOffset>) -> NutrientVector {
    let cutoff = start_of_day(now);

    records
        .iter()
        .filter(|record| record.timestamp >= cutoff)
        .map(|record| record.nutrition)
        .sum()
}

/// Per-record average over the whole history, `None` when there is no record.
pub fn all_time_average(records: &[MealRecord]) -> Option<NutrientVector> {
    let total: NutrientVector = records.iter().map(|record| record.nutrition).sum();
    total.divided_by(records.len())
}
