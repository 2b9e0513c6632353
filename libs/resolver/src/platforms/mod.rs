pub mod bigo;
pub mod bilibili;
pub mod douyin;
pub mod douyu;
pub mod huya;

use std::fmt;
use std::hash::{Hash, Hasher};

use url::Url;

use crate::errors::ResolutionError;
use crate::input::ResolutionInput;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Douyu,
    Huya,
    Bilibili,
    Douyin,
    Bigo,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Douyu,
        Platform::Huya,
        Platform::Bilibili,
        Platform::Douyin,
        Platform::Bigo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Douyu => "douyu",
            Platform::Huya => "huya",
            Platform::Bilibili => "bilibili",
            Platform::Douyin => "douyin",
            Platform::Bigo => "bigo",
        }
    }

    /// Display label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Douyu => "斗鱼",
            Platform::Huya => "虎牙",
            Platform::Bilibili => "B 站",
            Platform::Douyin => "抖音",
            Platform::Bigo => "Bigo",
        }
    }

    pub fn room_base_url(&self) -> &'static str {
        match self {
            Platform::Douyu => "https://www.douyu.com/",
            Platform::Huya => "https://www.huya.com/",
            Platform::Bilibili => "https://live.bilibili.com/",
            Platform::Douyin => "https://live.douyin.com/",
            Platform::Bigo => "https://www.bigo.tv/cn/",
        }
    }

    pub fn logo(&self) -> &'static str {
        match self {
            Platform::Douyu => "https://www.douyu.com/favicon.ico",
            Platform::Huya => "https://www.huya.com/favicon.ico",
            Platform::Bilibili => "https://www.bilibili.com/favicon.ico",
            Platform::Douyin => "https://p-pc-weboff.byteimg.com/tos-cn-i-9r5gewecjs/favicon.png",
            Platform::Bigo => "https://s2.loli.net/2025/08/31/DZgyj189JrkAHCs.png",
        }
    }

    /// Registered domain pasted urls must belong to, e.g. `douyu.com`.
    pub fn domain(&self) -> &'static str {
        match self {
            Platform::Douyu => "douyu.com",
            Platform::Huya => "huya.com",
            Platform::Bilibili => "bilibili.com",
            Platform::Douyin => "douyin.com",
            Platform::Bigo => "bigo.tv",
        }
    }

    /// Page of the room in a browser
    pub fn room_url(&self, room_id: u64) -> String {
        format!("{}{}", self.room_base_url(), room_id)
    }

    /// Whether resolution must stop and ask the user for configuration first.
    pub fn needs_configuration(&self, credentials: &PlatformCredentials) -> bool {
        match self {
            Platform::Bilibili => credentials.cookie().is_none(),
            _ => false,
        }
    }

    /// Builds the request handed to the remote resolver.
    ///
    /// Urls are checked against [`Platform::domain`] for every platform except bilibili,
    /// whose url is forwarded untouched.
    pub fn build_request(
        &self,
        input: &ResolutionInput,
        credentials: &PlatformCredentials,
    ) -> Result<RemoteRequest, ResolutionError> {
        match self {
            Platform::Douyu => douyu::build_request(input),
            Platform::Huya => huya::build_request(input),
            Platform::Bilibili => bilibili::build_request(input, credentials),
            Platform::Douyin => douyin::build_request(input),
            Platform::Bigo => bigo::build_request(input),
        }
    }

    /// Parses `raw` and checks it belongs to this platform.
    fn parse_room_url(&self, raw: &str) -> Result<Url, ResolutionError> {
        let url = Url::parse(raw).map_err(|_| ResolutionError::InvalidInput)?;
        match second_level_domain(&url) {
            Some(domain) if domain.eq_ignore_ascii_case(self.domain()) => Ok(url),
            _ => Err(ResolutionError::WrongDomain),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "douyu" => Ok(Platform::Douyu),
            "huya" => Ok(Platform::Huya),
            "bilibili" => Ok(Platform::Bilibili),
            "douyin" => Ok(Platform::Douyin),
            "bigo" => Ok(Platform::Bigo),
            _ => Err(format!("Invalid platform: {s}")),
        }
    }
}

impl Hash for Platform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
    }
}

/// Stored per-platform secrets. Only bilibili needs one, a session cookie.
#[derive(Debug, Clone, Default)]
pub struct PlatformCredentials {
    cookie: Option<String>,
}

impl PlatformCredentials {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cookie(cookie: &str) -> Self {
        let cookie = cookie.trim();
        Self {
            cookie: (!cookie.is_empty()).then(|| cookie.to_string()),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }
}

/// Validated request for the remote resolver.
///
/// Unset fields are sent as explicit nulls.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequest {
    pub room_id: Option<u64>,
    pub url: Option<String>,
    pub cookie: Option<String>,
}

impl RemoteRequest {
    pub fn room(room_id: u64) -> Self {
        Self {
            room_id: Some(room_id),
            url: None,
            cookie: None,
        }
    }
}

/// Registrable part of the url host: the last two labels, lowercased.
pub fn second_level_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_end_matches('.');
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join(".").to_ascii_lowercase())
}

/// Last non-empty path segment
fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.filter(|s| !s.is_empty()).last()
}

/// Room id carried by the last path segment, which must be all digits.
fn numeric_room_id(url: &Url) -> Result<u64, ResolutionError> {
    last_segment(url)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .ok_or(ResolutionError::InvalidInput)
}
