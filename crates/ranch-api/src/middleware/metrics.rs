//! # Request Metrics
//!
//! Records every request through the `metrics` facade. With the Prometheus
//! recorder installed the values are served at `/metrics`; without one the
//! macros are no-ops.
//!
//! | Metric | Kind | Labels |
//! |--------|------|--------|
//! | `ranch_requests_total` | counter | `method`, `status` |
//! | `ranch_request_duration_seconds` | histogram | `method` |
//! | `ranch_submissions_total` | counter | `outcome` (recorded by the address route) |

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that counts requests by method and status, and times them.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!("ranch_requests_total", "method" => method.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("ranch_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());

    response
}
