use url::Url;

use crate::errors::ResolutionError;

/// Validated user input, either a bare room id or an https room url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionInput {
    NumericRoomId(u64),
    Url(String),
}

impl ResolutionInput {
    /// Classifies raw user input.
    ///
    /// Whitespace is trimmed first. A string of ascii digits that fits in `u64` is a room
    /// id, an absolute `https` url with a host is a url, anything else is invalid.
    pub fn classify(raw: &str) -> Result<Self, ResolutionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ResolutionError::InvalidInput);
        }

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw
                .parse::<u64>()
                .map(ResolutionInput::NumericRoomId)
                .map_err(|_| ResolutionError::InvalidInput);
        }

        match Url::parse(raw) {
            Ok(url) if url.scheme() == "https" && url.host_str().is_some() => {
                Ok(ResolutionInput::Url(raw.to_string()))
            }
            _ => Err(ResolutionError::InvalidInput),
        }
    }

    pub fn room_id(&self) -> Option<u64> {
        match self {
            ResolutionInput::NumericRoomId(id) => Some(*id),
            ResolutionInput::Url(_) => None,
        }
    }
}
