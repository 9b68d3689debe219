use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::credentials::AdmissionRequest;

/// Webhook body posted by the media gateway for every WHIP/WHEP connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub action: String,
    /// `null` and absent both decode to `None` and are treated as "".
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub query_params: Option<HashMap<String, String>>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl WebhookPayload {
    pub fn to_admission_request(&self) -> AdmissionRequest {
        AdmissionRequest::new(
            self.action.as_str(),
            self.ip.as_deref().unwrap_or_default(),
            self.bearer_token.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub stream_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
