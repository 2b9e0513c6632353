use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

use super::{last_segment, Platform, RemoteRequest};

// rooms are addressed by number or by a custom alias, e.g. `/kpl`
static ROOM_SEGMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").ok());

fn is_room_segment(segment: &str) -> bool {
    ROOM_SEGMENT
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(segment))
}

/// Huya takes either a room id or a room url. Whichever is given is forwarded, the
/// other one is sent as null.
pub(crate) fn build_request(input: &ResolutionInput) -> Result<RemoteRequest, ResolutionError> {
    match input {
        ResolutionInput::NumericRoomId(room_id) => Ok(RemoteRequest::room(*room_id)),
        ResolutionInput::Url(raw) => {
            let url = Platform::Huya.parse_room_url(raw)?;
            match last_segment(&url) {
                Some(segment) if is_room_segment(segment) => Ok(RemoteRequest {
                    room_id: None,
                    url: Some(raw.clone()),
                    cookie: None,
                }),
                _ => Err(ResolutionError::InvalidInput),
            }
        }
    }
}
