use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

use super::{numeric_room_id, Platform, RemoteRequest};

/// `https://live.douyin.com/{room_id}`
pub(crate) fn build_request(input: &ResolutionInput) -> Result<RemoteRequest, ResolutionError> {
    let room_id = match input {
        ResolutionInput::NumericRoomId(room_id) => *room_id,
        ResolutionInput::Url(raw) => numeric_room_id(&Platform::Douyin.parse_room_url(raw)?)?,
    };
    Ok(RemoteRequest::room(room_id))
}
