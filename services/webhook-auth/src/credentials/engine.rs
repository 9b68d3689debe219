use std::{collections::HashSet, convert::Infallible, fmt, str::FromStr};

use tracing::{debug, warn};

use super::{AdmissionError, TokenMapping, WHEP_CONNECT, WHIP_CONNECT};

const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionAction {
    /// Publish (ingest) attempt; the credential is a bearer token.
    WhipConnect,
    /// Playback (egress) attempt; the credential is a stream key.
    WhepConnect,
    Other(String),
}

impl FromStr for AdmissionAction {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            WHIP_CONNECT => AdmissionAction::WhipConnect,
            WHEP_CONNECT => AdmissionAction::WhepConnect,
            other => AdmissionAction::Other(other.to_string()),
        })
    }
}

impl From<&str> for AdmissionAction {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for AdmissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionAction::WhipConnect => f.write_str(WHIP_CONNECT),
            AdmissionAction::WhepConnect => f.write_str(WHEP_CONNECT),
            AdmissionAction::Other(action) => f.write_str(action),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    pub action: AdmissionAction,
    pub source_ip: String,
    pub credential: String,
}

impl AdmissionRequest {
    pub fn new(
        action: impl Into<AdmissionAction>,
        source_ip: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            source_ip: source_ip.into(),
            credential: credential.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmissionVerdict {
    pub admitted: bool,
    /// Empty unless `admitted`.
    pub stream_key: String,
}

impl AdmissionVerdict {
    pub fn admit(stream_key: impl Into<String>) -> Self {
        Self {
            admitted: true,
            stream_key: stream_key.into(),
        }
    }

    pub fn deny() -> Self {
        Self::default()
    }
}

/// Decides webhook admissions against an immutable [`TokenMapping`].
///
/// Holds no interior mutability, so a single instance behind an `Arc` serves
/// every concurrent request without locking.
pub struct AdmissionEngine {
    mapping: TokenMapping,
    playback_keys: HashSet<String>,
    redact_credentials: bool,
}

impl AdmissionEngine {
    pub fn new(mapping: TokenMapping) -> Self {
        // Built from the resolved map so keys shadowed by a later duplicate
        // token stay unplayable.
        let playback_keys = mapping.stream_keys().map(str::to_string).collect();

        Self {
            mapping,
            playback_keys,
            redact_credentials: false,
        }
    }

    /// Masks presented credentials in denial audit logs.
    pub fn with_redacted_credentials(mut self, redact: bool) -> Self {
        self.redact_credentials = redact;
        self
    }

    pub fn mapping(&self) -> &TokenMapping {
        &self.mapping
    }

    pub fn decide(&self, request: &AdmissionRequest) -> Result<AdmissionVerdict, AdmissionError> {
        let verdict = match &request.action {
            AdmissionAction::WhipConnect => self
                .mapping
                .stream_key_for(&request.credential)
                .map(AdmissionVerdict::admit)
                .unwrap_or_else(AdmissionVerdict::deny),
            AdmissionAction::WhepConnect => {
                if self.playback_keys.contains(&request.credential) {
                    AdmissionVerdict::admit(request.credential.as_str())
                } else {
                    AdmissionVerdict::deny()
                }
            }
            AdmissionAction::Other(action) => {
                return Err(AdmissionError::UnrecognizedAction(action.clone()))
            }
        };

        record_outcome(request, &verdict, self.redact_credentials);
        Ok(verdict)
    }
}

/// Decides a single request by scanning `mapping` directly.
///
/// Prefer [`AdmissionEngine`] on the request path; it answers playback
/// lookups without walking every entry.
pub fn decide(
    mapping: &TokenMapping,
    request: &AdmissionRequest,
) -> Result<AdmissionVerdict, AdmissionError> {
    let verdict = match &request.action {
        AdmissionAction::WhipConnect => mapping
            .stream_key_for(&request.credential)
            .map(AdmissionVerdict::admit)
            .unwrap_or_else(AdmissionVerdict::deny),
        AdmissionAction::WhepConnect => {
            if mapping
                .stream_keys()
                .any(|stream_key| stream_key == request.credential)
            {
                AdmissionVerdict::admit(request.credential.as_str())
            } else {
                AdmissionVerdict::deny()
            }
        }
        AdmissionAction::Other(action) => {
            return Err(AdmissionError::UnrecognizedAction(action.clone()))
        }
    };

    record_outcome(request, &verdict, false);
    Ok(verdict)
}

fn record_outcome(request: &AdmissionRequest, verdict: &AdmissionVerdict, redact: bool) {
    if verdict.admitted {
        debug!(
            action = %request.action,
            source_ip = %request.source_ip,
            stream_key = %verdict.stream_key,
            "admission granted"
        );
        return;
    }

    let credential = if redact {
        REDACTED_PLACEHOLDER
    } else {
        request.credential.as_str()
    };

    warn!(
        target: "audit",
        action = %request.action,
        source_ip = %request.source_ip,
        credential = %credential,
        "rejected {} attempt",
        request.action
    );
}
