use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateStyle {
    pattern: String,
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DateStyle {
    pub fn new(pattern: &str) -> Result<Self, String> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err("date format is empty".to_string());
        }
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid date format '{pattern}'"));
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Renders a `date_column` value as a calendar date in `tz`.
    ///
    /// Offset-carrying timestamps and epoch milliseconds are converted into
    /// `tz` first. Plain dates and offset-less date-times are taken as wall
    /// clock values and never shifted.
    pub fn render<Tz: TimeZone>(&self, value: Option<&Value>, tz: &Tz) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(raw)) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return String::new();
                }
                match parse_date(raw, tz) {
                    Some(date) => self.format(date),
                    None => INVALID_DATE.to_string(),
                }
            }
            Some(Value::Number(n)) => {
                let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
                match millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
                    Some(dt) => self.format(dt.with_timezone(tz).date_naive()),
                    None => INVALID_DATE.to_string(),
                }
            }
            Some(_) => INVALID_DATE.to_string(),
        }
    }

    fn format(&self, date: NaiveDate) -> String {
        date.format(&self.pattern).to_string()
    }
}

fn parse_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
