use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};

static CUSTOMER_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new(
            "customer_operations_total",
            "Customer controller operations by outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("customer_operations_total");
    let _ = prometheus::default_registry().register(Box::new(c.clone()));
    c
});

pub fn record_operation(operation: &str, outcome: &str) {
    CUSTOMER_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

pub async fn render_metrics() -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
