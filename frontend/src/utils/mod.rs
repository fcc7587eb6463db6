pub mod timezone;

pub use timezone::{browser_timezone, date_input_value, format_date, format_timestamp, parse_tz};
