//! Boundary model for the routing backend's comparison payload
//!
//! Every field is optional and every scalar may arrive as a number or as a
//! pre-formatted string. Anything else is kept as `Other` so that one odd
//! field never fails the whole route.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::NormalizationError;
use crate::model::RouteKind;
use crate::Result;

const DEFAULT_REJECTION: &str = "Route calculation failed";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawField {
    /// Non-blank formatted text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawField::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// A finite, non-negative amount, accepting bare numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            RawField::Number(n) => *n,
            RawField::Text(s) => s.trim().parse::<f64>().ok()?,
            RawField::Other(_) => return None,
        };

        (n.is_finite() && n >= 0.0).then_some(n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub duration: Option<RawField>,
    #[serde(default)]
    pub duration_minutes: Option<RawField>,
    #[serde(default)]
    pub distance: Option<RawField>,
    #[serde(default)]
    pub distance_km: Option<RawField>,
    #[serde(default)]
    pub cost: Option<RawField>,
    #[serde(default)]
    pub cost_usd: Option<RawField>,
    #[serde(default)]
    pub carbon: Option<RawField>,
    #[serde(default)]
    pub carbon_kg: Option<RawField>,
    #[serde(default)]
    pub co2_kg: Option<RawField>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub polyline: Option<Value>,
    #[serde(default)]
    pub success: Option<Value>,
}

impl RawRoute {
    /// Parse one sub-object; non-objects count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        match serde_json::from_value(value.clone()) {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable route object");
                None
            }
        }
    }

    /// The backend marks individual failed variants with `success: false`.
    pub fn is_failed(&self) -> bool {
        matches!(self.success, Some(Value::Bool(false)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComparison {
    pub fastest: Option<RawRoute>,
    pub eco: Option<RawRoute>,
    pub cheapest: Option<RawRoute>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl RawComparison {
    /// Validate the overall structure of a backend response.
    ///
    /// Accepts either the bare comparison or the `{success, data, error}`
    /// envelope around it. A non-object yields an empty comparison.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(object) = unwrap_envelope(value)? else {
            return Ok(Self::default());
        };

        Ok(Self {
            fastest: route_for(object, RouteKind::Fastest),
            eco: route_for(object, RouteKind::Eco),
            cheapest: route_for(object, RouteKind::Cheapest),
            origin: object.get("origin").and_then(place_text),
            destination: object.get("destination").and_then(place_text),
        })
    }

    pub fn route(&self, kind: RouteKind) -> Option<&RawRoute> {
        match kind {
            RouteKind::Fastest => self.fastest.as_ref(),
            RouteKind::Eco => self.eco.as_ref(),
            RouteKind::Cheapest => self.cheapest.as_ref(),
        }
    }
}

fn unwrap_envelope(value: &Value) -> Result<Option<&Map<String, Value>>> {
    let Some(object) = value.as_object() else {
        return Ok(None);
    };

    match object.get("success") {
        Some(Value::Bool(false)) => {
            let message = object
                .get("error")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_REJECTION);
            Err(NormalizationError::Rejected(message.to_string()))
        }
        Some(Value::Bool(true)) => match object.get("data") {
            Some(Value::Object(data)) => Ok(Some(data)),
            _ => Ok(Some(object)),
        },
        _ => Ok(Some(object)),
    }
}

fn route_for(object: &Map<String, Value>, kind: RouteKind) -> Option<RawRoute> {
    kind.keys()
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(RawRoute::from_value)
}

fn place_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}
