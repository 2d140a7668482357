//! Route comparison commands
use geosense_core::{geocode, GeoPoint, RouteComparison};
use serde::Serialize;
use serde_json::Value;

use super::CommandResult;
use crate::state::AppState;

/// A comparison plus the map markers for its two endpoints
#[derive(Debug, Serialize)]
pub struct ComparisonView {
    pub comparison: RouteComparison,
    pub origin_point: GeoPoint,
    pub destination_point: GeoPoint,
}

impl ComparisonView {
    /// Markers use the backend's echoed place names when it sent them.
    pub fn new(comparison: RouteComparison, origin: &str, destination: &str) -> Self {
        let origin_point = geocode(comparison.origin().unwrap_or(origin));
        let destination_point = geocode(comparison.destination().unwrap_or(destination));

        Self {
            comparison,
            origin_point,
            destination_point,
        }
    }
}

pub async fn compare(
    state: &AppState,
    origin: &str,
    destination: &str,
) -> CommandResult<ComparisonView> {
    if !state.geosense().session_manager().is_authenticated() {
        return CommandResult::sign_in_required();
    }

    state
        .geosense()
        .compare_routes(origin, destination)
        .await
        .map(|comparison| ComparisonView::new(comparison, origin, destination))
        .into()
}

pub async fn health(state: &AppState) -> CommandResult<Value> {
    state.geosense().health_check().await.into()
}
