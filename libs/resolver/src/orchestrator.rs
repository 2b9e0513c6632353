use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::consumer::ResultConsumer;
use crate::errors::{ConsumeError, HistoryError, ResolutionError};
use crate::events::ResolverEvent;
use crate::input::ResolutionInput;
use crate::platforms::Platform;
use crate::traits::{CredentialStore, HistoryStore, RemoteResolver};
use crate::{HistoryRecord, ParsedResult};

/// Who asked for a resolution. Only used for single-flight bookkeeping.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionOrigin {
    SearchBar,
    HistoryEntry(usize),
}

/// How one `resolve` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(ParsedResult),
    Failed(ResolutionError),
    /// Not an error: the platform needs credentials the user has not configured yet.
    ConfigurationRequired(Platform),
    /// Another resolution was in flight, nothing was started or published.
    Rejected { active: ResolutionOrigin },
}

/// The published slot, at most one of result and error is set.
#[derive(Debug, Clone, Default)]
pub struct ResolverState {
    result: Option<ParsedResult>,
    error: Option<ResolutionError>,
}

impl ResolverState {
    fn clear(&mut self) {
        self.result = None;
        self.error = None;
    }
}

/// Releases the in-flight slot when the resolution is over, however it ended.
struct FlightGuard {
    slot: Arc<Mutex<Option<ResolutionOrigin>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Drives input classification, request building and the remote call, and owns the
/// published state. At most one resolution runs at a time.
#[derive(Clone)]
pub struct Resolver {
    remote: Arc<dyn RemoteResolver>,
    credentials: Arc<dyn CredentialStore>,
    consumer: ResultConsumer,
    state: Arc<RwLock<ResolverState>>,
    in_flight: Arc<Mutex<Option<ResolutionOrigin>>>,
    event_channel: broadcast::Sender<ResolverEvent>,
}

impl Resolver {
    pub fn new(
        remote: Arc<dyn RemoteResolver>,
        credentials: Arc<dyn CredentialStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let (event_channel, _) = broadcast::channel(100);
        Self {
            remote,
            credentials,
            consumer: ResultConsumer::new(history, event_channel.clone()),
            state: Arc::new(RwLock::new(ResolverState::default())),
            in_flight: Arc::new(Mutex::new(None)),
            event_channel,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResolverEvent> {
        self.event_channel.subscribe()
    }

    /// Claims the in-flight slot, or reports who holds it.
    fn begin(&self, origin: ResolutionOrigin) -> Result<FlightGuard, ResolutionOrigin> {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = *slot {
            return Err(active);
        }
        *slot = Some(origin);
        Ok(FlightGuard {
            slot: self.in_flight.clone(),
        })
    }

    /// Resolves `raw` on `platform` and publishes the outcome.
    ///
    /// Exactly one of result, error or configuration signal is published per accepted
    /// call, before the in-flight slot is released. An accepted resolution runs on its
    /// own task, so dropping the returned future does not cancel it. A call made while
    /// another is in flight returns [`ResolveOutcome::Rejected`] and leaves the state
    /// untouched.
    pub async fn resolve(
        &self,
        origin: ResolutionOrigin,
        platform: Platform,
        raw: &str,
    ) -> ResolveOutcome {
        let guard = match self.begin(origin) {
            Ok(guard) => guard,
            Err(active) => {
                log::warn!(
                    "[{}]Resolution from {:?} rejected, {:?} is in flight",
                    platform,
                    origin,
                    active
                );
                return ResolveOutcome::Rejected { active };
            }
        };

        let resolver = self.clone();
        let raw = raw.to_string();
        let task = tokio::spawn(async move {
            let _guard = guard;
            resolver.state.write().await.clear();
            let _ = resolver
                .event_channel
                .send(ResolverEvent::Started { origin, platform });

            let outcome = resolver.run(platform, &raw).await;
            resolver.publish(platform, &outcome).await;
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("[{}]Resolution task failed: {}", platform, e);
                ResolveOutcome::Failed(ResolutionError::Backend(e.to_string()))
            }
        }
    }

    /// Fire-and-forget form of [`Resolver::resolve`].
    pub fn resolve_detached(
        &self,
        origin: ResolutionOrigin,
        platform: Platform,
        raw: &str,
    ) -> JoinHandle<ResolveOutcome> {
        let resolver = self.clone();
        let raw = raw.to_string();
        tokio::spawn(async move { resolver.resolve(origin, platform, &raw).await })
    }

    async fn run(&self, platform: Platform, raw: &str) -> ResolveOutcome {
        let input = match ResolutionInput::classify(raw) {
            Ok(input) => input,
            Err(e) => return ResolveOutcome::Failed(e),
        };

        let credentials = self.credentials.read_credential(platform).await;
        if platform.needs_configuration(&credentials) {
            log::info!("[{}]Credentials missing, configuration required", platform);
            return ResolveOutcome::ConfigurationRequired(platform);
        }

        let request = match platform.build_request(&input, &credentials) {
            Ok(request) => request,
            Err(e) => return ResolveOutcome::Failed(e),
        };

        log::info!(
            "[{}]Resolving room_id: {:?}, url: {:?}",
            platform,
            request.room_id,
            request.url
        );
        match self.remote.resolve(platform, &request).await {
            Ok(result) => {
                log::info!(
                    "[{}]Resolved room {} with {} links",
                    platform,
                    result.room_id,
                    result.links.len()
                );
                ResolveOutcome::Resolved(result)
            }
            Err(failure) => ResolveOutcome::Failed(failure.classify(platform)),
        }
    }

    async fn publish(&self, platform: Platform, outcome: &ResolveOutcome) {
        let event = match outcome {
            ResolveOutcome::Resolved(result) => {
                self.state.write().await.result = Some(result.clone());
                ResolverEvent::Resolved {
                    result: result.clone(),
                }
            }
            ResolveOutcome::Failed(error) => {
                if error.is_input_error() {
                    log::debug!("[{}]Input rejected: {}", platform, error);
                } else {
                    log::warn!("[{}]Resolution failed: {}", platform, error);
                }
                self.state.write().await.error = Some(error.clone());
                ResolverEvent::Failed {
                    platform,
                    error: error.clone(),
                }
            }
            ResolveOutcome::ConfigurationRequired(platform) => {
                ResolverEvent::ConfigurationRequired {
                    platform: *platform,
                }
            }
            ResolveOutcome::Rejected { .. } => return,
        };
        let _ = self.event_channel.send(event);
    }

    pub async fn current_result(&self) -> Option<ParsedResult> {
        self.state.read().await.result.clone()
    }

    pub async fn current_error(&self) -> Option<ResolutionError> {
        self.state.read().await.error.clone()
    }

    pub fn is_resolving(&self, origin: ResolutionOrigin) -> bool {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) == Some(origin)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Takes the link at `index` out of the current result and records the playback.
    pub async fn consume_link(&self, index: usize) -> Result<String, ConsumeError> {
        let mut state = self.state.write().await;
        let result = state.result.as_mut().ok_or(ConsumeError::NoResult)?;
        let link = self.consumer.consume(result, index).await?;
        Ok(link)
    }

    pub async fn history(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        self.consumer.history().list().await
    }
}
