use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::errors::ConsumeError;
use crate::events::ResolverEvent;
use crate::traits::HistoryStore;
use crate::{HistoryRecord, ParsedResult};

/// Hands out single-use links and records each playback in the history store.
#[derive(Clone)]
pub struct ResultConsumer {
    history: Arc<dyn HistoryStore>,
    event_channel: broadcast::Sender<ResolverEvent>,
}

impl ResultConsumer {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        event_channel: broadcast::Sender<ResolverEvent>,
    ) -> Self {
        Self {
            history,
            event_channel,
        }
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Removes the link at `index` and records the playback.
    ///
    /// The result stays valid when its last link is taken.
    pub async fn consume(
        &self,
        result: &mut ParsedResult,
        index: usize,
    ) -> Result<String, ConsumeError> {
        let (link, record) = take_link(result, index)?;
        self.record_play(&record).await?;
        Ok(link)
    }

    /// Persists the record then asks listeners to refresh the history list.
    async fn record_play(&self, record: &HistoryRecord) -> Result<(), ConsumeError> {
        self.history.persist(record).await?;
        log::info!(
            "[{}]History recorded for room {}",
            record.platform,
            record.room_id
        );
        let _ = self.event_channel.send(ResolverEvent::HistoryChanged);
        Ok(())
    }
}

/// Removes the link at `index` in place, returning it with the history record of the play.
fn take_link(
    result: &mut ParsedResult,
    index: usize,
) -> Result<(String, HistoryRecord), ConsumeError> {
    if index >= result.links.len() {
        return Err(ConsumeError::LinkNotFound { index });
    }
    let link = result.links.remove(index);
    Ok((link, HistoryRecord::from_result(result, Utc::now())))
}
