//! Request logging for the provisioning API.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// One `request` span per call with method, URI and version.
///
/// Request start is logged at `DEBUG`; the response status and latency at
/// `INFO`, since `add-domain` calls routinely take tens of seconds while
/// certbot runs. 5xx responses are additionally logged at `ERROR`.
///
/// ```text
/// INFO request{method=POST uri=/add-domain version=HTTP/1.1}: finished processing request latency=14203 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
