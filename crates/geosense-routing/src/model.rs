//! Normalized route comparison model

use serde::{Deserialize, Serialize};

/// Label used wherever the backend gave no usable value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Fastest,
    Eco,
    Cheapest,
}

impl RouteKind {
    /// Rendering order; consumers index into comparisons with it.
    pub const ALL: [RouteKind; 3] = [RouteKind::Fastest, RouteKind::Eco, RouteKind::Cheapest];

    /// Payload keys accepted for this kind, preferred first.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            RouteKind::Fastest => &["fastest"],
            RouteKind::Eco => &["eco", "eco_friendly", "eco-friendly"],
            RouteKind::Cheapest => &["cheapest"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteKind::Fastest => "Fastest",
            RouteKind::Eco => "Eco-Friendly",
            RouteKind::Cheapest => "Cost Efficient",
        }
    }

    pub fn color_hint(&self) -> &'static str {
        match self {
            RouteKind::Fastest => "#1E90FF",
            RouteKind::Eco => "#228B22",
            RouteKind::Cheapest => "#FF8C00",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RouteKind::Fastest => 0,
            RouteKind::Eco => 1,
            RouteKind::Cheapest => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.keys()[0]
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Finite and within WGS84 bounds.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        valid.then_some(Self { lat, lon })
    }
}

/// A display label plus the number behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(NOT_AVAILABLE, 0.0)
    }

    pub fn is_available(&self) -> bool {
        self.label != NOT_AVAILABLE
    }
}

/// One normalized route variant. Built only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    kind: RouteKind,
    label: &'static str,
    available: bool,
    duration: Metric,
    distance: Metric,
    cost: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    carbon_kg: Option<f64>,
    geometry: Vec<GeoPoint>,
    color_hint: &'static str,
}

impl RouteOption {
    pub(crate) fn resolved(
        kind: RouteKind,
        duration: Metric,
        distance: Metric,
        cost: Metric,
        carbon_kg: Option<f64>,
        geometry: Vec<GeoPoint>,
    ) -> Self {
        Self {
            kind,
            label: kind.label(),
            available: true,
            duration,
            distance,
            cost,
            carbon_kg,
            geometry,
            color_hint: kind.color_hint(),
        }
    }

    /// Placeholder for a kind the backend did not return.
    pub(crate) fn unavailable(kind: RouteKind) -> Self {
        Self {
            kind,
            label: kind.label(),
            available: false,
            duration: Metric::unavailable(),
            distance: Metric::unavailable(),
            cost: Metric::unavailable(),
            carbon_kg: None,
            geometry: Vec::new(),
            color_hint: kind.color_hint(),
        }
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn duration(&self) -> &Metric {
        &self.duration
    }

    pub fn distance(&self) -> &Metric {
        &self.distance
    }

    pub fn cost(&self) -> &Metric {
        &self.cost
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration.value
    }

    pub fn distance_km(&self) -> f64 {
        self.distance.value
    }

    pub fn cost_usd(&self) -> f64 {
        self.cost.value
    }

    pub fn carbon_kg(&self) -> Option<f64> {
        self.carbon_kg
    }

    pub fn geometry(&self) -> &[GeoPoint] {
        &self.geometry
    }

    pub fn color_hint(&self) -> &'static str {
        self.color_hint
    }
}

/// Exactly three options in [`RouteKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteComparison {
    options: [RouteOption; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
}

impl RouteComparison {
    pub(crate) fn new(
        options: [RouteOption; 3],
        origin: Option<String>,
        destination: Option<String>,
    ) -> Self {
        debug_assert!(options
            .iter()
            .zip(RouteKind::ALL)
            .all(|(option, kind)| option.kind == kind));

        Self {
            options,
            origin,
            destination,
        }
    }

    pub fn options(&self) -> &[RouteOption; 3] {
        &self.options
    }

    pub fn get(&self, kind: RouteKind) -> &RouteOption {
        &self.options[kind.index()]
    }

    pub fn available(&self) -> impl Iterator<Item = &RouteOption> {
        self.options.iter().filter(|o| o.available)
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }
}
