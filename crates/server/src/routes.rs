use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod pickups;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn pickup_routes() -> Router<ServerState> {
    Router::new()
        .route("/pickups", get(pickups::list).post(pickups::create))
        .route(
            "/pickups/:id",
            get(pickups::get).put(pickups::update).delete(pickups::delete),
        )
        .route("/environmental-impact", get(pickups::environmental_impact))
}

/// Build the full application router. Pickup routes are served both at the
/// root and under `/api`.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .merge(pickup_routes())
        .nest("/api", pickup_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> anyhow::Result<Router> {
        let db = models::db::connect_in_memory().await?;
        Ok(build_router(ServerState::new(db), CorsLayer::very_permissive()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&v)?)
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body)?).await?;
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    fn pickup_body(user: &str) -> Value {
        json!({
            "wasteType": "Plastic",
            "pickupLocation": "12 Harbor Way",
            "pickupDateTime": "2030-03-04 10:00:00",
            "userName": user
        })
    }

    #[tokio::test]
    async fn health_and_openapi_are_served() -> anyhow::Result<()> {
        let app = app().await?;
        let (s, body) = send(&app, Method::GET, "/health", None).await?;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (s, doc) = send(&app, Method::GET, "/openapi.json", None).await?;
        assert_eq!(s, StatusCode::OK);
        assert!(doc["paths"]["/pickups/{id}"].is_object());
        assert!(doc["paths"]["/environmental-impact"].is_object());
        Ok(())
    }

    #[tokio::test]
    async fn create_then_fetch_under_both_prefixes() -> anyhow::Result<()> {
        let app = app().await?;
        let (s, created) = send(&app, Method::POST, "/pickups", Some(pickup_body("nina"))).await?;
        assert_eq!(s, StatusCode::CREATED);
        assert_eq!(created["status"], "Pending");
        assert_eq!(created["pickupDateTime"], "2030-03-04 10:00:00");
        let id = created["id"].as_i64().unwrap();

        let (s, fetched) = send(&app, Method::GET, &format!("/api/pickups/{id}"), None).await?;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(fetched, created);
        Ok(())
    }

    #[tokio::test]
    async fn bad_input_is_a_400_with_error_body() -> anyhow::Result<()> {
        let app = app().await?;
        let mut body = pickup_body("oscar");
        body.as_object_mut().unwrap().remove("userName");
        let (s, err) = send(&app, Method::POST, "/pickups", Some(body)).await?;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Validation Error");
        assert!(err["detail"].as_str().unwrap().contains("userName"));

        let req = Request::builder()
            .method(Method::POST)
            .uri("/pickups")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))?;
        let res = app.clone().oneshot(req).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let (s, _) = send(&app, Method::GET, "/pickups/abc", None).await?;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        let (s, _) = send(&app, Method::GET, "/pickups?status=lost", None).await?;
        assert_eq!(s, StatusCode::BAD_REQUEST);

        let (s, list) = send(&app, Method::GET, "/pickups", None).await?;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(list, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_are_404() -> anyhow::Result<()> {
        let app = app().await?;
        let (s, err) = send(&app, Method::GET, "/pickups/41", None).await?;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(err["error"], "Not Found");
        let (s, _) = send(&app, Method::PUT, "/pickups/41", Some(json!({"status": "Scheduled"}))).await?;
        assert_eq!(s, StatusCode::NOT_FOUND);
        let (s, _) = send(&app, Method::DELETE, "/pickups/41", None).await?;
        assert_eq!(s, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_combine() -> anyhow::Result<()> {
        let app = app().await?;
        for user in ["pia", "pia", "raj"] {
            send(&app, Method::POST, "/pickups", Some(pickup_body(user))).await?;
        }
        let (_, first) = send(&app, Method::GET, "/pickups?userName=pia", None).await?;
        let id = first[0]["id"].as_i64().unwrap();
        let (s, _) = send(&app, Method::PUT, &format!("/pickups/{id}"), Some(json!({"status": "scheduled"}))).await?;
        assert_eq!(s, StatusCode::OK);

        let (_, pia) = send(&app, Method::GET, "/pickups?userName=pia", None).await?;
        assert_eq!(pia.as_array().unwrap().len(), 2);
        let (_, scheduled) = send(&app, Method::GET, "/pickups?status=Scheduled&userName=pia", None).await?;
        assert_eq!(scheduled.as_array().unwrap().len(), 1);
        assert_eq!(scheduled[0]["id"].as_i64(), Some(id));
        let (_, none) = send(&app, Method::GET, "/pickups?status=Scheduled&userName=raj", None).await?;
        assert_eq!(none, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() -> anyhow::Result<()> {
        let app = app().await?;
        let (_, created) = send(&app, Method::POST, "/api/pickups", Some(pickup_body("sol"))).await?;
        let id = created["id"].as_i64().unwrap();

        let (s, updated) = send(&app, Method::PUT, &format!("/api/pickups/{id}"), Some(json!({"pickupLocation": "7 Elm St"}))).await?;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(updated["pickupLocation"], "7 Elm St");
        assert_eq!(updated["creationTimestamp"], created["creationTimestamp"]);
        assert_eq!(updated["status"], "Pending");

        let (s, body) = send(&app, Method::DELETE, &format!("/api/pickups/{id}"), None).await?;
        assert_eq!(s, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        let (s, _) = send(&app, Method::GET, &format!("/api/pickups/{id}"), None).await?;
        assert_eq!(s, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn impact_of_empty_store_is_zero() -> anyhow::Result<()> {
        let app = app().await?;
        let (s, body) = send(&app, Method::GET, "/environmental-impact", None).await?;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(body, json!({
            "totalRecycledWasteKg": 0.0,
            "co2ReductionKg": 0.0,
            "wasteTypeDistribution": {},
            "totalCompletedPickups": 0
        }));
        Ok(())
    }
}
