use std::sync::Arc;

use stream_gate_webhook_auth::{
    parse_mapping, AdmissionAction, AdmissionEngine, AdmissionRequest, TokenMapping,
};

pub use serde_json;
pub use stream_gate_webhook_auth;

pub struct AdmissionBenchFixture {
    pub engine: Arc<AdmissionEngine>,
    pub mapping: TokenMapping,
    pub entries: usize,
}

impl AdmissionBenchFixture {
    /// Builds a mapping of `entries` pairs named `token-{i}:stream-{i}`.
    pub fn new(entries: usize) -> Self {
        let mapping = parse_mapping(&raw_mapping(entries));
        Self {
            engine: Arc::new(AdmissionEngine::new(mapping.clone())),
            mapping,
            entries,
        }
    }

    /// Request for the last configured pair, the worst case for a linear scan.
    pub fn last_entry_request(&self, action: AdmissionAction) -> AdmissionRequest {
        let index = self.entries.saturating_sub(1);
        let credential = match action {
            AdmissionAction::WhepConnect => format!("stream-{index}"),
            _ => format!("token-{index}"),
        };
        AdmissionRequest::new(action, "203.0.113.7", credential)
    }

    pub fn unknown_request(&self, action: AdmissionAction) -> AdmissionRequest {
        AdmissionRequest::new(action, "203.0.113.7", "not-configured")
    }
}

pub fn raw_mapping(entries: usize) -> String {
    (0..entries)
        .map(|i| format!("token-{i}:stream-{i}"))
        .collect::<Vec<_>>()
        .join(",")
}
