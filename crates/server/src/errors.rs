use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::error;

/// Error response rendered as `{"error": <title>, "detail": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }

    pub fn bad_request(title: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, title, Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: &self.title, detail: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_validation() {
            return JsonApiError::bad_request("Validation Error", validation_message(e));
        }
        match e {
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            other => {
                error!(err = %other, "store operation failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Database Error", Some(other.to_string()))
            }
        }
    }
}

fn validation_message(e: ServiceError) -> String {
    match e {
        ServiceError::Validation(msg) | ServiceError::Model(models::errors::ModelError::Validation(msg)) => msg,
        other => other.to_string(),
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        JsonApiError::bad_request("Invalid JSON", r.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        JsonApiError::bad_request("Invalid Path", r.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self {
        JsonApiError::bad_request("Invalid Query", r.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    async fn body_json(e: JsonApiError) -> (StatusCode, serde_json::Value) {
        let res = e.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn service_errors_map_to_status_codes() {
        let (s, body) = body_json(ServiceError::Validation("missing required field: userName".into()).into()).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Validation Error", "detail": "missing required field: userName"}));

        let (s, _) = body_json(ServiceError::from(ModelError::Validation("bad".into())).into()).await;
        assert_eq!(s, StatusCode::BAD_REQUEST);

        let (s, body) = body_json(ServiceError::not_found("pickup").into()).await;
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");

        let (s, _) = body_json(ServiceError::Db("disk I/O error".into()).into()).await;
        assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
        let (s, _) = body_json(ServiceError::from(ModelError::Db("locked".into())).into()).await;
        assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn detail_is_omitted_when_absent() {
        let (_, body) = body_json(JsonApiError::new(StatusCode::BAD_REQUEST, "Bad", None)).await;
        assert_eq!(body, serde_json::json!({"error": "Bad"}));
    }
}
