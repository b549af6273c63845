// src/api.rs
// Liveness surface. Deliberately trivial: the scheduler does not depend on
// it and it holds no state beyond the metrics handle.

use axum::{routing::get, Router};

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(|| async { "forex-calendar-bot: alive" }))
        .route("/health", get(|| async { "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_answers_ok() {
        let app = create_router();
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
