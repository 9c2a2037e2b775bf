//! Query endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a travel question
pub async fn query_travel(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let response = state.pipeline().answer_detailed(&request.question).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::server::state::fixtures;
    use crate::server::RagServer;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(answer: Option<&'static str>) -> Router {
        RagServer::with_state(fixtures::state(answer)).router()
    }

    async fn post_query(router: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::post("/api/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_query_returns_answer_and_passages() {
        let (status, body) = post_query(
            router(Some("Visit Parvati Valley.")),
            json!({ "question": "offbeat places near Manali" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Visit Parvati Valley.");
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["passages"][0]["text"], "Parvati Valley hidden villages.");
        assert_eq!(body["passages"].as_array().unwrap().len(), 2);
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_blank_question_is_bad_request() {
        let (status, body) = post_query(router(Some("unused")), json!({ "question": "  " })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "empty_query");
    }

    #[tokio::test]
    async fn test_generator_failure_is_bad_gateway() {
        let (status, body) =
            post_query(router(None), json!({ "question": "offbeat places near Manali" })).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "generation_error");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_info() {
        let response = router(Some("ok"))
            .oneshot(Request::get("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["name"], "offbeat-rag");
        assert_eq!(body["index"], fixtures::INDEX);
        assert_eq!(body["top_k"], 3);
    }
}
