use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
use chrono_tz::Tz;

/// Parse an IANA zone name, falling back to UTC
pub fn parse_tz(tz_str: &str) -> Tz {
    tz_str.parse().unwrap_or(chrono_tz::UTC)
}

/// The zone the browser reports through `Intl.DateTimeFormat`. Outside a
/// browser, or for an unknown name, this is UTC.
pub fn browser_timezone() -> Tz {
    #[cfg(target_arch = "wasm32")]
    {
        let options = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new())
            .resolved_options();
        js_sys::Reflect::get(&options, &"timeZone".into())
            .ok()
            .and_then(|value| value.as_string())
            .map(|name| parse_tz(&name))
            .unwrap_or(chrono_tz::UTC)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono_tz::UTC
    }
}

fn to_local(timestamp: i64, tz: Tz) -> Option<DateTime<Tz>> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.with_timezone(&tz))
}

/// Format Unix seconds as date and time (e.g., "Jan 15, 2024 12:30")
pub fn format_timestamp(timestamp: i64, tz: Tz) -> String {
    to_local(timestamp, tz)
        .map(|local| local.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Format Unix seconds as a date only
pub fn format_date(timestamp: i64, tz: Tz) -> String {
    to_local(timestamp, tz)
        .map(|local| local.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Value for an `<input type="date">`; anything unparsable becomes empty
pub fn date_input_value(date: Option<&str>) -> String {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
