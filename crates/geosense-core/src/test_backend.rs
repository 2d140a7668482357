//! In-process stand-in for the GeoSense backend used by tests.

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;

pub const TOKEN: &str = "tok-live";
pub const GOOD_PASSWORD: &str = "secret1";

/// Start the backend on an ephemeral port and return its base URL.
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/routing/compare", post(compare))
        .route(
            "/api/routing/fastest",
            post(|headers: HeaderMap| async move { single_route(&headers, "fastest") }),
        )
        .route(
            "/api/routing/cheapest",
            post(|headers: HeaderMap| async move { single_route(&headers, "cheapest") }),
        )
        .route(
            "/api/routing/eco-friendly",
            post(|headers: HeaderMap| async move { single_route(&headers, "eco") }),
        )
        .route("/api/health", get(health))
        .route("/api/insights/traffic", get(traffic))
        .route("/api/insights/busiest-hours", get(busiest_hours))
        .route("/api/reports/list", get(reports));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Token has expired"})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == GOOD_PASSWORD {
        Json(json!({
            "token": TOKEN,
            "user": {"id": 7, "email": body["email"], "name": "Ana"}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("taken@example.com") => (StatusCode::CONFLICT, "conflict").into_response(),
        Some("broken@example.com") => Json(json!({"token": TOKEN})).into_response(),
        _ => Json(json!({
            "token": TOKEN,
            "user": {"id": "u-9", "email": body["email"], "name": body["name"]}
        }))
        .into_response(),
    }
}

async fn compare(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    Json(json!({
        "success": true,
        "data": {
            "origin": body["origin"],
            "destination": body["destination"],
            "cheapest": {"cost_usd": 3.5, "distance": "14 km"},
            "fastest": {
                "duration": "25 min",
                "distance": "12.5 km",
                "cost": "$5.20",
                "geometry": [[28.61, 77.20], [28.53, 77.39]]
            }
        }
    }))
    .into_response()
}

fn single_route(headers: &HeaderMap, kind: &str) -> Response {
    if !authorized(headers) {
        return unauthorized();
    }
    Json(json!({"kind": kind, "duration": "25 min"})).into_response()
}

async fn health(headers: HeaderMap) -> Response {
    Json(json!({
        "status": "ok",
        "request_id_seen": headers.contains_key("x-request-id"),
    }))
    .into_response()
}

async fn traffic(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let lat: f64 = params.get("lat").and_then(|v| v.parse().ok()).unwrap_or(0.0);
    if !(-90.0..=90.0).contains(&lat) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Latitude out of range"})),
        )
            .into_response();
    }

    Json(json!({"lat": params.get("lat"), "lon": params.get("lon"), "congestion": 0.4}))
        .into_response()
}

async fn busiest_hours(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"lat": params.get("lat"), "hours": [8, 9, 18]})).into_response()
}

async fn reports(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"reports": [{"id": 1, "type": "accident"}]})).into_response()
}
