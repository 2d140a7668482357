//! Per-field resolvers
//!
//! Each scalar resolves with the same precedence: the backend's formatted
//! string if present, else a label derived from the numeric value, else the
//! "N/A" sentinel.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::model::{GeoPoint, Metric};
use crate::raw::RawField;

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*([a-z]+)?").expect("valid regex")
});

static DISTANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(km|kilomet(?:er|re)s?|mi(?:les?)?|met(?:er|re)s?|m)?")
        .expect("valid regex")
});

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid regex"));

static DECIMAL_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+,\d{2}$").expect("valid regex"));

const KM_PER_MILE: f64 = 1.609_344;

pub fn resolve_duration(formatted: Option<&RawField>, minutes: Option<&RawField>) -> Metric {
    resolve_metric(formatted, minutes, parse_duration_minutes, format_duration)
}

pub fn resolve_distance(formatted: Option<&RawField>, km: Option<&RawField>) -> Metric {
    resolve_metric(formatted, km, parse_distance_km, format_distance)
}

pub fn resolve_cost(formatted: Option<&RawField>, usd: Option<&RawField>) -> Metric {
    resolve_metric(formatted, usd, parse_amount, format_cost)
}

/// First usable carbon figure in kilograms, formatted or numeric.
pub fn resolve_carbon(candidates: &[Option<&RawField>]) -> Option<f64> {
    candidates.iter().flatten().find_map(|field| {
        field
            .as_number()
            .or_else(|| field.as_text().and_then(parse_amount))
    })
}

/// Points from `geometry`, or from `polyline` when `geometry` has none.
pub fn resolve_geometry(geometry: Option<&Value>, polyline: Option<&Value>) -> Vec<GeoPoint> {
    let points = geometry.map(parse_points).unwrap_or_default();
    if !points.is_empty() {
        return points;
    }
    polyline.map(parse_points).unwrap_or_default()
}

fn resolve_metric(
    formatted: Option<&RawField>,
    numeric: Option<&RawField>,
    parse: fn(&str) -> Option<f64>,
    format: fn(f64) -> String,
) -> Metric {
    let numeric_value = numeric.and_then(RawField::as_number);

    if let Some(text) = formatted.and_then(RawField::as_text) {
        let value = parse(text).or(numeric_value).unwrap_or(0.0);
        return Metric::new(text, value);
    }

    // The primary key may itself carry the number
    match formatted.and_then(RawField::as_number).or(numeric_value) {
        Some(n) => Metric::new(format(n), n),
        None => Metric::unavailable(),
    }
}

/// `"25 min"` → 25, `"1 h 5 min"` → 65, `"1.5 hours"` → 90.
///
/// Only numbers carrying an hour or minute unit are summed, so route names
/// and range bounds (`"25-30 min"` → 30) don't leak in. A label with no
/// unit at all is read as its first number of minutes.
pub fn parse_duration_minutes(text: &str) -> Option<f64> {
    let text = text.replace(',', "");
    let mut first = None;
    let mut total = None;

    for caps in DURATION_PART.captures_iter(&text) {
        let n: f64 = caps[1].parse().ok()?;
        first.get_or_insert(n);

        let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());
        let minutes = match unit.as_deref() {
            Some("h" | "hr" | "hrs" | "hour" | "hours") => n * 60.0,
            Some("m" | "min" | "mins" | "minute" | "minutes") => n,
            _ => continue,
        };
        total = Some(total.unwrap_or(0.0) + minutes);
    }

    total.or(first)
}

/// `"12.5 km"` → 12.5, `"800 m"` → 0.8, `"2 mi"` → 3.22.
pub fn parse_distance_km(text: &str) -> Option<f64> {
    let text = text.replace(',', "");
    let caps = DISTANCE.captures(&text)?;
    let n: f64 = caps[1].parse().ok()?;

    let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());
    let km = match unit.as_deref() {
        Some(u) if u.starts_with("mi") => n * KM_PER_MILE,
        Some(u) if u == "m" || u.starts_with("met") => n / 1000.0,
        _ => n,
    };

    Some(km)
}

/// `"$5.20"` → 5.2, `"₹1,200"` → 1200, `"5,20 €"` → 5.2.
///
/// A comma followed by exactly two trailing digits is a decimal comma;
/// any other comma is a thousands separator.
pub fn parse_amount(text: &str) -> Option<f64> {
    let amount = AMOUNT.find(text)?.as_str().trim_end_matches(',');

    let normalized = if DECIMAL_COMMA.is_match(amount) {
        amount.replace(',', ".")
    } else {
        amount.replace(',', "")
    };

    normalized.parse().ok()
}

pub fn format_duration(minutes: f64) -> String {
    format!("{} min", minutes.round() as i64)
}

pub fn format_distance(km: f64) -> String {
    format!("{} km", trim_decimal(km))
}

pub fn format_cost(usd: f64) -> String {
    format!("${:.2}", usd)
}

fn trim_decimal(n: f64) -> String {
    let s = format!("{:.2}", n);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Lenient per point: anything that is not `[lat, lon]` or `{lat, lon}`
/// (or `{lat, lng}`) with in-range coordinates is dropped.
fn parse_points(value: &Value) -> Vec<GeoPoint> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    let points: Vec<GeoPoint> = items.iter().filter_map(parse_point).collect();

    let dropped = items.len() - points.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = points.len(), "Dropped invalid geometry points");
    }

    points
}

fn parse_point(value: &Value) -> Option<GeoPoint> {
    match value {
        Value::Array(pair) if pair.len() == 2 => GeoPoint::new(pair[0].as_f64()?, pair[1].as_f64()?),
        Value::Object(obj) => {
            let lat = obj.get("lat")?.as_f64()?;
            let lon = obj.get("lon").or_else(|| obj.get("lng"))?.as_f64()?;
            GeoPoint::new(lat, lon)
        }
        _ => None,
    }
}
