pub mod consumer;
pub mod errors;
pub mod events;
pub mod http_client;
pub mod input;
pub mod orchestrator;
pub mod platforms;
pub mod traits;

use chrono::{DateTime, Utc};

use crate::platforms::Platform;

pub use crate::errors::{RemoteFailure, ResolutionError, TransportKind};
pub use crate::input::ResolutionInput;
pub use crate::orchestrator::{ResolutionOrigin, ResolveOutcome, Resolver};

/// Metadata and playable links of a live room, as returned by the remote resolver.
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub platform: Platform,
    #[serde(rename = "roomID")]
    pub room_id: u64,
    pub anchor: String,
    pub title: String,
    pub category: String,
    /// Stream urls in preference order. Each link is single use.
    pub links: Vec<String>,
}

/// One playback entry in the history store.
///
/// `id` is assigned by the store, records built before insertion carry `0`.
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: i64,
    pub platform: Platform,
    pub anchor: String,
    pub room_id: u64,
    pub category: String,
    pub last_title: String,
    pub last_play_time: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn from_result(result: &ParsedResult, played_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            platform: result.platform,
            anchor: result.anchor.clone(),
            room_id: result.room_id,
            category: result.category.clone(),
            last_title: result.title.clone(),
            last_play_time: played_at,
        }
    }
}
