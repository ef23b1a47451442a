//! Error types for CRM calls

use thiserror::Error;

/// Faults raised by a CRM metadata fetch.
///
/// Handlers treat every variant the same way (log, then redirect to the
/// error view); the variants exist so the log line can name the fault kind.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{kind}: {message}")]
    Api { kind: String, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl CrmError {
    /// Short fault-kind label for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            CrmError::Http(_) => "Http",
            CrmError::Api { .. } => "Api",
            CrmError::Decode(_) => "Decode",
        }
    }
}
