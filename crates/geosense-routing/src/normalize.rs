//! Route comparison normalizer

use serde_json::Value;

use crate::error::NormalizationError;
use crate::model::{RouteComparison, RouteKind, RouteOption};
use crate::raw::{RawComparison, RawRoute};
use crate::resolve::{
    resolve_carbon, resolve_cost, resolve_distance, resolve_duration, resolve_geometry,
};
use crate::Result;

/// Normalize a raw `/api/routing/compare` response.
pub fn normalize(raw: &Value) -> Result<RouteComparison> {
    let raw = RawComparison::from_value(raw)?;
    normalize_raw(raw)
}

/// Normalize an already validated payload.
///
/// Kinds resolve independently. Only when none of the three resolves is the
/// result an error; otherwise the missing kinds become placeholders.
pub fn normalize_raw(raw: RawComparison) -> Result<RouteComparison> {
    let options = RouteKind::ALL.map(|kind| match raw.route(kind) {
        Some(route) if !route.is_failed() => resolve_route(kind, route),
        Some(_) => {
            tracing::debug!(kind = %kind, "Backend reported this route as failed");
            RouteOption::unavailable(kind)
        }
        None => RouteOption::unavailable(kind),
    });

    let available = options.iter().filter(|o| o.is_available()).count();
    if available == 0 {
        tracing::info!("Route comparison contained no usable routes");
        return Err(NormalizationError::EmptyComparison);
    }

    tracing::debug!(available, "Normalized route comparison");

    Ok(RouteComparison::new(options, raw.origin, raw.destination))
}

fn resolve_route(kind: RouteKind, route: &RawRoute) -> RouteOption {
    RouteOption::resolved(
        kind,
        resolve_duration(route.duration.as_ref(), route.duration_minutes.as_ref()),
        resolve_distance(route.distance.as_ref(), route.distance_km.as_ref()),
        resolve_cost(route.cost.as_ref(), route.cost_usd.as_ref()),
        resolve_carbon(&[
            route.carbon_kg.as_ref(),
            route.co2_kg.as_ref(),
            route.carbon.as_ref(),
        ]),
        resolve_geometry(route.geometry.as_ref(), route.polyline.as_ref()),
    )
}
