use querycrate::RequestCriteria;

/// Install a test-writer subscriber so parser events show up with `--nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub fn parse(query: &str) -> RequestCriteria {
    init_tracing();
    RequestCriteria::parse(query).expect("query should parse")
}

/// Decoded parameters as JSON, for comparing against `json!` literals
pub fn params_json(criteria: &RequestCriteria) -> serde_json::Value {
    serde_json::to_value(criteria.query_params()).expect("parameters serialize")
}
