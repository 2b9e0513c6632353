use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

use super::{PlatformCredentials, RemoteRequest};

/// Bilibili urls are forwarded as is, short links and event pages are resolved remotely.
///
/// The caller checks the cookie beforehand with [`super::Platform::needs_configuration`].
pub(crate) fn build_request(
    input: &ResolutionInput,
    credentials: &PlatformCredentials,
) -> Result<RemoteRequest, ResolutionError> {
    let (room_id, url) = match input {
        ResolutionInput::NumericRoomId(room_id) => (Some(*room_id), None),
        ResolutionInput::Url(raw) => (None, Some(raw.clone())),
    };
    Ok(RemoteRequest {
        room_id,
        url,
        cookie: credentials.cookie().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_is_forwarded() {
        let credentials = PlatformCredentials::with_cookie("SESSDATA=abc; bili_jct=def");
        let request = build_request(&ResolutionInput::NumericRoomId(6), &credentials).unwrap();
        assert_eq!(request.room_id, Some(6));
        assert_eq!(request.url, None);
        assert_eq!(request.cookie.as_deref(), Some("SESSDATA=abc; bili_jct=def"));
    }

    #[test]
    fn test_url_is_forwarded_without_domain_check() {
        let credentials = PlatformCredentials::with_cookie("SESSDATA=abc");
        let input = ResolutionInput::Url("https://b23.tv/xYz12".to_string());
        let request = build_request(&input, &credentials).unwrap();
        assert_eq!(request.room_id, None);
        assert_eq!(request.url.as_deref(), Some("https://b23.tv/xYz12"));
    }
}
