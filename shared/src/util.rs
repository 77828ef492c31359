use chrono::NaiveDate;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque resource id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// UTC day bounds `[start, end)` in milliseconds for the day containing `millis`
pub fn day_bounds_millis(millis: i64) -> (i64, i64) {
    const DAY_MS: i64 = 86_400_000;
    let start = millis.div_euclid(DAY_MS) * DAY_MS;
    (start, start + DAY_MS)
}

/// UTC bounds `[start, end)` in milliseconds of a calendar month
///
/// `None` for a month outside 1..=12 or an unrepresentable year.
pub fn month_bounds_millis(year: i32, month: u32) -> Option<(i64, i64)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((midnight_millis(start)?, midnight_millis(end)?))
}

/// UTC bounds `[start, end)` in milliseconds of a calendar year
pub fn year_bounds_millis(year: i32) -> Option<(i64, i64)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
    Some((midnight_millis(start)?, midnight_millis(end)?))
}

fn midnight_millis(date: NaiveDate) -> Option<i64> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}
