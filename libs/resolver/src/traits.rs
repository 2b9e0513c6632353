use async_trait::async_trait;

use crate::errors::{HistoryError, RemoteFailure};
use crate::platforms::{Platform, PlatformCredentials, RemoteRequest};
use crate::{HistoryRecord, ParsedResult};

/// Executes the platform specific fetch and decode.
///
/// Calls must be idempotent, the resolver never retries on its own.
#[async_trait]
pub trait RemoteResolver: Send + Sync {
    async fn resolve(
        &self,
        platform: Platform,
        request: &RemoteRequest,
    ) -> Result<ParsedResult, RemoteFailure>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn read_credential(&self, platform: Platform) -> PlatformCredentials;
}

/// Playback history, newest first when listed.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn persist(&self, record: &HistoryRecord) -> Result<(), HistoryError>;
    async fn list(&self) -> Result<Vec<HistoryRecord>, HistoryError>;
}
