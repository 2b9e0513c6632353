use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

use super::{last_segment, Platform, RemoteRequest};

/// Douyu room urls look like `https://www.douyu.com/288016`. The beta site prefixes the
/// path with `/beta`, and topic pages carry the room id in the `rid` query parameter.
pub(crate) fn build_request(input: &ResolutionInput) -> Result<RemoteRequest, ResolutionError> {
    match input {
        ResolutionInput::NumericRoomId(room_id) => Ok(RemoteRequest::room(*room_id)),
        ResolutionInput::Url(raw) => {
            let url = Platform::Douyu.parse_room_url(raw)?;
            room_id_from_url(&url).map(RemoteRequest::room)
        }
    }
}

fn room_id_from_url(url: &url::Url) -> Result<u64, ResolutionError> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let segments = match segments.split_first() {
        Some((&"beta", rest)) => rest,
        _ => &segments[..],
    };

    if let Some(id) = segments
        .last()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<u64>().ok())
    {
        return Ok(id);
    }

    // 房间号可能在查询参数 rid 中
    match url.query_pairs().find(|(k, _)| k == "rid") {
        Some((_, rid)) => rid.parse().map_err(|_| ResolutionError::InvalidInput),
        None => {
            log::debug!(
                "[{}]No room id in {:?}",
                Platform::Douyu,
                last_segment(url)
            );
            Err(ResolutionError::InvalidInput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str) -> Result<RemoteRequest, ResolutionError> {
        build_request(&ResolutionInput::Url(raw.to_string()))
    }

    #[test]
    fn test_room_id_from_path() {
        assert_eq!(build("https://www.douyu.com/123"), Ok(RemoteRequest::room(123)));
        assert_eq!(build("https://www.douyu.com/123/"), Ok(RemoteRequest::room(123)));
        assert_eq!(build("https://www.douyu.com/beta/9999"), Ok(RemoteRequest::room(9999)));
    }

    #[test]
    fn test_room_id_from_rid_query() {
        assert_eq!(
            build("https://www.douyu.com/topic/s14?rid=123"),
            Ok(RemoteRequest::room(123))
        );
        assert_eq!(build("https://www.douyu.com/?rid=123"), Ok(RemoteRequest::room(123)));
    }

    #[test]
    fn test_path_and_rid_agree() {
        assert_eq!(
            build("https://www.douyu.com/123"),
            build("https://www.douyu.com/wrongpath?rid=123")
        );
    }

    #[test]
    fn test_invalid_room_url() {
        assert_eq!(build("https://www.douyu.com/wrongpath"), Err(ResolutionError::InvalidInput));
        assert_eq!(build("https://www.douyu.com/"), Err(ResolutionError::InvalidInput));
        assert_eq!(
            build("https://www.douyu.com/topic?rid=abc"),
            Err(ResolutionError::InvalidInput)
        );
    }

    #[test]
    fn test_wrong_domain() {
        assert_eq!(build("https://www.huya.com/123"), Err(ResolutionError::WrongDomain));
    }

    #[test]
    fn test_numeric_input() {
        assert_eq!(
            build_request(&ResolutionInput::NumericRoomId(288016)),
            Ok(RemoteRequest::room(288016))
        );
    }
}
