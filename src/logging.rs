//! Logging utilities for bjerknes.
//!
//! Structured `tracing` helpers shared by the CLI and the HTTP server. Field
//! names (`operation`, `duration_ms`, `request_id`, `colortable`, `region`,
//! `overlay`) are kept stable so logs can be filtered across both surfaces.

use std::time::Instant;
use tracing::{debug, error, info, warn, Level};

use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::{trace::OnResponse, LatencyUnit};
use uuid::Uuid;

use crate::error::BjerknesError;
use crate::state::Dataset;

/// Creates the tracing layer for HTTP request/response logging
pub fn create_http_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    impl OnResponse<tower_http::classify::ServerErrorsFailureClass>,
> {
    let response_formatter = DefaultOnResponse::new()
        .level(Level::DEBUG)
        .latency_unit(LatencyUnit::Millis);

    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(response_formatter)
}

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Announce a long-running CLI step such as a dataset load or a chart.
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    info!(operation, details = details.unwrap_or("-"), "Starting");
}

/// Close a step opened with [`log_operation_start`].
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    if success {
        info!(operation, duration_ms, "Finished");
    } else {
        warn!(operation, duration_ms, "Failed");
    }
}

/// Run `f` and log how long it took.
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    debug!(operation, "Starting");
    let result = f();
    info!(
        operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Timed"
    );
    result
}

/// Log what a loaded dataset holds
pub fn log_dataset_stats(file_path: &str, dataset: &Dataset) {
    let summary = dataset.summary();
    let bytes: usize = dataset
        .data
        .values()
        .map(|a| a.len() * std::mem::size_of::<f32>())
        .sum();
    info!(
        operation = "data_load",
        file_path = file_path,
        var_count = summary.variables,
        grid_vars = %summary.grid_variables.join(", "),
        dim_count = summary.dimensions,
        memory_mb = bytes / (1024 * 1024),
        "Data loaded successfully"
    );
}

/// Log a finished chart
pub fn log_chart_rendered(
    product: &str,
    colortable: &str,
    region: &str,
    bytes: usize,
    start_time: Instant,
) {
    info!(
        operation = "render_chart",
        product = product,
        colortable = colortable,
        region = region,
        bytes = bytes,
        duration_ms = start_time.elapsed().as_secs_f64() * 1000.0,
        "Chart rendered"
    );
}

/// Log a failure outside of request handling, e.g. a CLI command.
pub fn log_error(error: &BjerknesError, context: &str) {
    error!(
        error = %error,
        context,
        client_error = error.is_client_error(),
        "{}",
        context
    );
}

/// Log an error that occurred during request processing
pub fn log_request_error(
    error: &BjerknesError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) {
    if error.is_client_error() {
        warn!(
            error = %error,
            endpoint = endpoint,
            request_id = request_id,
            params = params.unwrap_or("none"),
            "Rejected request"
        );
    } else {
        error!(
            error = %error,
            endpoint = endpoint,
            request_id = request_id,
            params = params.unwrap_or("none"),
            "Request processing error"
        );
    }
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert!(!id1.is_empty());
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_log_timed_operation_returns_result() {
        let started = Instant::now();
        let table = log_timed_operation("lookup", || {
            std::thread::sleep(Duration::from_millis(1));
            "qpf_nws"
        });
        assert_eq!(table, "qpf_nws");
        assert!(started.elapsed() >= Duration::from_millis(1));
        log_operation_end("lookup", started, true);
    }
}
