use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Formats accepted for `lastLogin`, tried in order after RFC 3339.
/// The first is what a `datetime-local` input submits.
const LAST_LOGIN_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Fractional seconds are written only when present.
pub const LAST_LOGIN_SERIALIZE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time is before Unix epoch")
        .as_secs() as i64
}

/// Parse a login timestamp as sent by a form or returned by the store.
/// Offsets are normalised to UTC and dropped.
pub fn parse_last_login(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    LAST_LOGIN_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a `dateJoined` value. The store may hand back a timestamp for a date
/// column, in which case only the date part is kept.
pub fn parse_date_joined(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_last_login(raw).map(|dt| dt.date()))
}

/// DD.MM.YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// DD.MM.YYYY h:mm:ss AM/PM, with midnight and noon shown as 12
pub fn format_date_time(dt: NaiveDateTime) -> String {
    let (is_pm, hour) = dt.hour12();
    format!(
        "{} {}:{:02}:{:02} {}",
        format_date(dt.date()),
        hour,
        dt.minute(),
        dt.second(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Serde adapter for `lastLogin` columns.
pub mod last_login_format {
    use super::{parse_last_login, LAST_LOGIN_SERIALIZE_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(LAST_LOGIN_SERIALIZE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_last_login(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid lastLogin timestamp: {}", raw)))
    }
}

/// Serde adapter for `dateJoined` columns.
pub mod date_joined_format {
    use super::parse_date_joined;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date_joined(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid dateJoined date: {}", raw)))
    }
}
