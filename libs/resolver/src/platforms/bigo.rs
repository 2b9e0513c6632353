use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

use super::{numeric_room_id, Platform, RemoteRequest};

/// `https://www.bigo.tv/cn/{room_id}`, the locale segment is optional.
pub(crate) fn build_request(input: &ResolutionInput) -> Result<RemoteRequest, ResolutionError> {
    let room_id = match input {
        ResolutionInput::NumericRoomId(room_id) => *room_id,
        ResolutionInput::Url(raw) => numeric_room_id(&Platform::Bigo.parse_room_url(raw)?)?,
    };
    Ok(RemoteRequest::room(room_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request() {
        assert_eq!(
            build_request(&ResolutionInput::NumericRoomId(12345)),
            Ok(RemoteRequest::room(12345))
        );

        for raw in ["https://www.bigo.tv/cn/52", "https://www.bigo.tv/52"] {
            let input = ResolutionInput::Url(raw.to_string());
            assert_eq!(build_request(&input), Ok(RemoteRequest::room(52)));
        }

        let input = ResolutionInput::Url("https://www.bigo.tv/cn/".to_string());
        assert_eq!(build_request(&input), Err(ResolutionError::InvalidInput));
    }
}
