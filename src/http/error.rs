use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Network,
    Service,
    Parse,
    InvalidCredential,
    ServiceDisabled,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Network => "Network",
            TransportKind::Service => "Service",
            TransportKind::Parse => "Parse",
            TransportKind::InvalidCredential => "Invalid credential",
            TransportKind::ServiceDisabled => "Service disabled",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Empty search query")]
    EmptyQuery,

    #[error("No API key configured")]
    Config,

    #[error("No lyrics found for '{0}'")]
    NotFound(String),

    #[error("{kind} error: {detail}")]
    Transport { kind: TransportKind, detail: String },
}

impl LookupError {
    pub fn transport(kind: TransportKind, detail: impl Into<String>) -> Self {
        LookupError::Transport {
            kind,
            detail: detail.into(),
        }
    }

    /// Text shown next to the results.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyQuery => "Please enter a song title and artist.".to_string(),
            LookupError::Config => {
                "No API key configured. Set GEMINI_API_KEY and restart.".to_string()
            }
            LookupError::NotFound(query) => format!("Could not find lyrics for \"{query}\"."),
            LookupError::Transport { kind, .. } => {
                let base = "Something went wrong while fetching lyrics. Please try again later.";
                match kind {
                    TransportKind::InvalidCredential => {
                        format!("{base} The configured API key is not valid.")
                    }
                    TransportKind::ServiceDisabled => format!(
                        "{base} The Generative Language API is not enabled for this key's project."
                    ),
                    _ => base.to_string(),
                }
            }
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::transport(TransportKind::Parse, e.to_string())
        } else {
            LookupError::transport(TransportKind::Network, e.to_string())
        }
    }
}
