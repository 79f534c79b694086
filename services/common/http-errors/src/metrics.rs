use axum::{body::Body, http::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts};
use std::{collections::HashSet, future::Future, pin::Pin, sync::Mutex};

/// Upper bound on distinct `code` label values before codes collapse into [`OVERFLOW_CODE`].
pub const MAX_ERROR_CODES: usize = 40;
pub const OVERFLOW_CODE: &str = "other";

static HTTP_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new(
            "http_errors_total",
            "Count of HTTP error responses emitted (status >= 400)",
        ),
        &["service", "code", "status"],
    )
    .expect("http_errors_total");
    let _ = prometheus::default_registry().register(Box::new(c.clone()));
    c
});

static ERROR_CODES_DISTINCT: Lazy<IntGauge> = Lazy::new(|| {
    let g = IntGauge::new("http_error_codes_distinct", "Distinct error codes tracked as labels")
        .expect("http_error_codes_distinct");
    let _ = prometheus::default_registry().register(Box::new(g.clone()));
    g
});

static ERROR_CODE_OVERFLOW_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new(
        "http_error_code_overflow_total",
        "Error responses whose code was bucketed into the overflow label",
    )
    .expect("http_error_code_overflow_total");
    let _ = prometheus::default_registry().register(Box::new(c.clone()));
    c
});

static SEEN_CODES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

fn label_for(code: &str) -> String {
    let mut seen = match SEEN_CODES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if seen.contains(code) {
        return code.to_string();
    }
    if seen.len() < MAX_ERROR_CODES {
        seen.insert(code.to_string());
        ERROR_CODES_DISTINCT.set(seen.len() as i64);
        return code.to_string();
    }
    ERROR_CODE_OVERFLOW_TOTAL.inc();
    OVERFLOW_CODE.to_string()
}

fn record_response(service: &str, resp: &Response) {
    let status = resp.status();
    if status.as_u16() < 400 {
        return;
    }
    let code = resp
        .headers()
        .get("X-Error-Code")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let label = label_for(code);
    HTTP_ERRORS_TOTAL
        .with_label_values(&[service, label.as_str(), status.as_str()])
        .inc();
}

pub type MetricsFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Middleware for `axum::middleware::from_fn` counting every response with status >= 400.
pub fn http_error_metrics_layer(
    service: &'static str,
) -> impl Fn(Request<Body>, Next) -> MetricsFuture + Clone + Send + Sync + 'static {
    move |req: Request<Body>, next: Next| {
        Box::pin(async move {
            let resp = next.run(req).await;
            record_response(service, &resp);
            resp
        })
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use super::*;

    pub fn simulate_error_code(code: &str) {
        let label = label_for(code);
        HTTP_ERRORS_TOTAL
            .with_label_values(&["test-helpers", label.as_str(), "400"])
            .inc();
    }

    pub fn distinct_gauge() -> i64 {
        ERROR_CODES_DISTINCT.get()
    }

    pub fn overflow_count() -> u64 {
        ERROR_CODE_OVERFLOW_TOTAL.get()
    }
}
