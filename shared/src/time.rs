use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Format used for dates in exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for timestamps in exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format used to stamp export file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Return the date in given timezone
///
/// Hire dates are calendar dates, so "today" depends on where the office is.
///
/// # Example
///```
/// use shared::time::today_in;
/// use chrono_tz::Asia::Ho_Chi_Minh;
/// let today = today_in(Ho_Chi_Minh);
/// ```
pub fn today_in(timezone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&timezone).date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds `<base>_<yyyyMMdd_HHmmss>.<extension>` from a UTC instant.
pub fn stamped_file_name(base: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!("{base}_{}.{extension}", at.format(FILE_STAMP_FORMAT))
}
