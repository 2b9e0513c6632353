use std::fmt;

use thiserror::Error;

use crate::platforms::Platform;

pub const ISSUE_URL: &str = "https://github.com/alley-rs/lsar/issues";

pub const CONNECT_LABEL: &str = "http error: Connect";
pub const TIMEOUT_LABEL: &str = "http error: Timeout";
pub const DECODE_LABEL: &str = "http error: Decode";
pub const OTHER_LABEL: &str = "http error: Other";
pub const NOT_LIVE_LABEL: &str = "room state: NotLive";
pub const IS_REPLAY_LABEL: &str = "room state: IsReplay";

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Connect,
    Timeout,
    Decode,
    Other,
}

impl TransportKind {
    /// The raw label the remote side reports for this failure.
    pub fn label(&self) -> &'static str {
        match self {
            TransportKind::Connect => CONNECT_LABEL,
            TransportKind::Timeout => TIMEOUT_LABEL,
            TransportKind::Decode => DECODE_LABEL,
            TransportKind::Other => OTHER_LABEL,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Connect => "Network connection failed, check your network",
            TransportKind::Timeout => "Network request timed out, try again later",
            TransportKind::Decode => "Failed to decode the response",
            TransportKind::Other => "Unknown network error",
        };
        write!(f, "{}", s)
    }
}

/// Terminal failure of one resolution, already classified for display.
#[derive(Error, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail")]
pub enum ResolutionError {
    #[error("Input is neither a room id nor an https url")]
    InvalidInput,
    #[error("Url does not belong to the selected platform")]
    WrongDomain,
    #[error("Room is not live")]
    NotLive,
    #[error("Room is replaying, replays are not resolved")]
    IsReplay,
    #[error("{0}")]
    Transport(TransportKind),
    #[error("{0}, please report it at {url}", url = ISSUE_URL)]
    Backend(String),
}

impl ResolutionError {
    /// Input errors are detected locally, before any remote call.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ResolutionError::InvalidInput | ResolutionError::WrongDomain)
    }
}

/// Raw failure reported across the remote boundary.
///
/// The payload is the remote side's message verbatim, classification happens in
/// [`RemoteFailure::classify`].
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub error: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn transport(kind: TransportKind) -> Self {
        Self::new(kind.label())
    }

    /// Maps the raw label onto the user-facing taxonomy.
    ///
    /// Only exact labels are recognized. Anything else is an unanticipated remote
    /// condition, logged with the platform tag and kept verbatim.
    pub fn classify(&self, platform: Platform) -> ResolutionError {
        match self.error.as_str() {
            CONNECT_LABEL => ResolutionError::Transport(TransportKind::Connect),
            TIMEOUT_LABEL => ResolutionError::Transport(TransportKind::Timeout),
            DECODE_LABEL => ResolutionError::Transport(TransportKind::Decode),
            OTHER_LABEL => ResolutionError::Transport(TransportKind::Other),
            NOT_LIVE_LABEL => ResolutionError::NotLive,
            IS_REPLAY_LABEL => ResolutionError::IsReplay,
            _ => {
                log::error!("[{}]Unclassified backend failure: {}", platform, self.error);
                ResolutionError::Backend(self.error.clone())
            }
        }
    }
}

impl From<reqwest::Error> for RemoteFailure {
    fn from(value: reqwest::Error) -> Self {
        let kind = if value.is_connect() {
            TransportKind::Connect
        } else if value.is_timeout() {
            TransportKind::Timeout
        } else if value.is_decode() {
            TransportKind::Decode
        } else {
            TransportKind::Other
        };
        log::debug!("Remote transport failure: {}", value);
        Self::transport(kind)
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History store error: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum ConsumeError {
    #[error("No parsed result to consume from")]
    NoResult,
    #[error("Link not found: {index}")]
    LinkNotFound { index: usize },
    #[error("Persist history failed: {0}")]
    History(#[from] HistoryError),
}
