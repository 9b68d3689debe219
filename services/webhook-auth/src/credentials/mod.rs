use thiserror::Error;

mod engine;
mod mapping;

pub use engine::{decide, AdmissionAction, AdmissionEngine, AdmissionRequest, AdmissionVerdict};
pub use mapping::{parse_mapping, TokenMapping};

pub const WHIP_CONNECT: &str = "whip-connect";
pub const WHEP_CONNECT: &str = "whep-connect";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("unrecognized action '{0}'")]
    UnrecognizedAction(String),
}
