mod dashboard;
mod keywords;
mod settings;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use rankdash_client::{ClientError, RankApiClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: RankApiClient,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Local validation failures are the caller's fault; everything else is the
/// remote API's.
pub(super) fn map_client_error(request_id: String, error: &ClientError) -> ApiError {
    match error {
        ClientError::InvalidUpload(_)
        | ClientError::InvalidKeyword(_)
        | ClientError::InvalidSettings(_) => {
            tracing::warn!(error = %error, "rejected invalid input");
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "ranking API request failed");
            ApiError::new(request_id, "upstream_error", "ranking API request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route("/api/v1/keywords", post(keywords::create_keyword))
        .route("/api/v1/keywords/upload", post(keywords::upload_keywords))
        .route("/api/v1/settings", put(settings::save_settings))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rankdash_core::{ConfigError, CsvError};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOUNDARY: &str = "rankdash-test-boundary";

    fn app_for(server: &MockServer) -> Router {
        let client = RankApiClient::new(&server.uri(), 5, "rankdash-test/0.1").expect("client");
        build_app(AppState { client })
    }

    async fn mount_reads(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/keywords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "keyword": "best seo tools", "volume": 1000, "difficulty": 65.0 },
                { "id": 2, "keyword": "keyword research tips" }
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/rankings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "keyword_id": 1, "platform": "google", "position": 3, "visibility_score": 80.0 },
                { "keyword_id": 2, "platform": "google", "position": 5, "visibility_score": 60.0 },
                { "keyword_id": 1, "platform": "bing", "position": 10, "visibility_score": 40.0 }
            ])))
            .mount(server)
            .await;
    }

    fn multipart_request(uri: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("bad_request", StatusCode::BAD_REQUEST),
            ("upstream_error", StatusCode::BAD_GATEWAY),
            ("anything_else", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, expected) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), expected, "code {code}");
        }
    }

    #[test]
    fn client_validation_errors_are_validation_errors() {
        let err = map_client_error("req-1".into(), &ClientError::InvalidUpload(CsvError::NoRows));
        assert_eq!(err.error.code, "validation_error");

        let err = map_client_error(
            "req-2".into(),
            &ClientError::InvalidSettings(ConfigError::Validation("bad".into())),
        );
        assert_eq!(err.error.code, "validation_error");

        let err = map_client_error(
            "req-3".into(),
            &ClientError::UnexpectedStatus {
                status: 500,
                url: "http://upstream/api/keywords".into(),
            },
        );
        assert_eq!(err.error.code, "upstream_error");
        assert_eq!(err.error.message, "ranking API request failed");
    }

    #[tokio::test]
    async fn health_returns_ok_and_echoes_request_id() {
        let server = MockServer::start().await;
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-health")
        );
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-health");
    }

    #[tokio::test]
    async fn dashboard_renders_summary_platforms_and_keywords() {
        let server = MockServer::start().await;
        mount_reads(&server).await;

        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let data = &json["data"];
        assert_eq!(data["summary"]["total_keywords"], 2);
        assert_eq!(data["summary"]["observation_count"], 3);
        assert_eq!(data["summary"]["top_platform"], "google");
        assert_eq!(data["platforms"].as_array().map(Vec::len), Some(2));
        assert_eq!(data["keywords"][0]["google_position"], 3);
        assert!(data["keywords"][1]["volume"].is_null());
    }

    #[tokio::test]
    async fn dashboard_is_empty_when_upstream_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["summary"]["total_keywords"], 0);
        assert!(json["data"]["summary"]["avg_position"].is_null());
        assert!(json["data"]["summary"]["top_platform"].is_null());
        assert_eq!(json["data"]["keywords"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn upload_forwards_valid_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload-keywords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let csv = "Keyword,Target URL,Search Country,Volume,Difficulty,CPC,Intent\n\
                   best seo tools,https://example.com/seo-tools,us,1000,65,5.2,commercial";
        let response = app_for(&server)
            .oneshot(multipart_request("/api/v1/keywords/upload", "kw.csv", csv))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["keyword_count"], 1);
        assert_eq!(
            json["data"]["message"],
            "Successfully uploaded kw.csv. Processing started for 1 keywords."
        );
    }

    #[tokio::test]
    async fn upload_rejects_bad_csv_with_400() {
        let server = MockServer::start().await;
        let response = app_for(&server)
            .oneshot(multipart_request(
                "/api/v1/keywords/upload",
                "bad.csv",
                "keyword\nseo",
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_bad_request() {
        let server = MockServer::start().await;
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             value\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/keywords/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");

        let response = app_for(&server).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn create_keyword_maps_upstream_failure_to_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/keywords"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let draft = json!({ "keyword": "rank tracker", "target_url": "https://example.com" });
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/keywords")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(draft.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn settings_reply_masks_api_keys() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let payload = json!({ "alert_threshold": 10, "openai_api_key": "sk-secret" });
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/settings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["alert_threshold"], 10);
        assert_eq!(json["data"]["openai_api_key"], "[redacted]");
        assert!(!json.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn settings_with_blank_email_are_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/settings"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let payload = json!({ "notification_email": "", "alert_threshold": 5 });
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/settings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["data"]["notification_email"].is_null());
    }

    #[tokio::test]
    async fn settings_out_of_range_are_rejected() {
        let server = MockServer::start().await;
        let payload = json!({ "alert_threshold": 0 });
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/settings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
