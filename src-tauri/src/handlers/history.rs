use resolver::HistoryRecord;

use crate::state::State;

pub async fn get_history(state: &State) -> Result<Vec<HistoryRecord>, String> {
    state.resolver.history().await.map_err(|e| e.to_string())
}

pub async fn delete_history(state: &State, id: i64) -> Result<(), String> {
    state.db.remove_history(id).await?;
    log::info!("History {} deleted", id);
    Ok(())
}
