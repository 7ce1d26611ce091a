use time::OffsetDateTime;
use time::macros::format_description;

/// Formats a datetime as a human-readable `YYYY-MM-DD HH:MM:SS` string.
pub fn format_timestamp(datetime: OffsetDateTime) -> String {
    datetime
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| datetime.unix_timestamp().to_string())
}

/// Returns the current local time, or UTC when the local offset is unknown.
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}
