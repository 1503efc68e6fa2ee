pub mod rate_limit;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use studypoint_common::metrics::RequestMetrics;

/// Records request count and latency per method and matched route.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let method = req.method().to_string();

    let recorder = RequestMetrics::start(&method, &path);
    let response = next.run(req).await;
    recorder.finish(response.status().as_u16());

    response
}
