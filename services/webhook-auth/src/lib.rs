pub mod api;
pub mod config;
pub mod credentials;

pub use api::{create_router, ErrorResponse, WebhookPayload, WebhookResponse};
pub use config::WebhookConfig;
pub use credentials::{
    decide, parse_mapping, AdmissionAction, AdmissionEngine, AdmissionError, AdmissionRequest,
    AdmissionVerdict, TokenMapping,
};
