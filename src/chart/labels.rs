use chrono::{DateTime, Datelike, Utc};

fn utc(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Price axis label with two decimals and no grouping; non-finite prices read `0.00`.
pub fn format_price_label(price: f64) -> String {
    if price.is_finite() {
        format!("{price:.2}")
    } else {
        "0.00".to_owned()
    }
}

/// Day-of-month, or `M/D` when `from_ms` and `to_ms` fall in different months (UTC).
pub fn format_day_label(t_ms: i64, from_ms: i64, to_ms: i64) -> String {
    let Some(t) = utc(t_ms) else {
        return String::new();
    };
    let same_month = match (utc(from_ms), utc(to_ms)) {
        (Some(a), Some(b)) => a.year() == b.year() && a.month() == b.month(),
        _ => true,
    };
    if same_month {
        t.day().to_string()
    } else {
        format!("{}/{}", t.month(), t.day())
    }
}

/// Footer text for the render time.
pub fn format_updated_label(now_ms: i64) -> String {
    match utc(now_ms) {
        Some(now) => format!("UPDATED {} UTC", now.format("%H:%M")),
        None => "UPDATED --:-- UTC".to_owned(),
    }
}
