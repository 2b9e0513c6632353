use resolver::platforms::Platform;
use resolver::{ResolutionOrigin, ResolveOutcome};

use crate::handlers::utils::play;
use crate::state::State;

pub async fn resolve(
    state: &State,
    origin: ResolutionOrigin,
    platform: Platform,
    input: &str,
) -> ResolveOutcome {
    log::info!("[{}]Resolve requested from {:?}: {}", platform, origin, input);
    state.resolver.resolve(origin, platform, input).await
}

/// Resolves the room of the history entry at `index` again.
pub async fn replay(state: &State, index: usize) -> Result<ResolveOutcome, String> {
    let records = state.resolver.history().await.map_err(|e| e.to_string())?;
    let Some(record) = records.get(index) else {
        return Err(format!("History entry not found: {}", index));
    };
    Ok(state
        .resolver
        .resolve(
            ResolutionOrigin::HistoryEntry(index),
            record.platform,
            &record.room_id.to_string(),
        )
        .await)
}

/// Consumes the link at `index` and starts the configured player with it.
pub async fn play_link(state: &State, index: usize) -> Result<String, String> {
    let link = state
        .resolver
        .consume_link(index)
        .await
        .map_err(|e| e.to_string())?;
    let player = state.config.read().await.player.clone();
    play(&player, &link).await?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use resolver::errors::RemoteFailure;
    use resolver::platforms::RemoteRequest;
    use resolver::traits::RemoteResolver;
    use resolver::{ParsedResult, Resolver};
    use tokio::sync::RwLock;

    use super::*;
    use crate::config::Config;
    use crate::credentials::ConfigCredentials;
    use crate::database::Database;

    struct EchoRemote;

    #[async_trait]
    impl RemoteResolver for EchoRemote {
        async fn resolve(
            &self,
            platform: Platform,
            request: &RemoteRequest,
        ) -> Result<ParsedResult, RemoteFailure> {
            let Some(room_id) = request.room_id else {
                return Err(RemoteFailure::new("room state: NotLive"));
            };
            Ok(ParsedResult {
                platform,
                room_id,
                anchor: "主播".to_string(),
                title: format!("room {}", room_id),
                category: "网游竞技".to_string(),
                links: vec!["https://a.flv".to_string(), "https://b.flv".to_string()],
            })
        }
    }

    async fn test_state(name: &str) -> State {
        let _ = env_logger::try_init();
        let path = std::env::temp_dir()
            .join(format!("lsar-test-handlers-{}-{}", name, std::process::id()))
            .join("Conf.toml");
        let _ = std::fs::remove_file(&path);
        let config = Arc::new(RwLock::new(Config::load_from(&path).unwrap()));

        let db = Arc::new(Database::new());
        db.open_in_memory().await.unwrap();
        let resolver = Resolver::new(
            Arc::new(EchoRemote),
            Arc::new(ConfigCredentials::new(config.clone())),
            db.clone(),
        );
        State {
            db,
            config,
            resolver,
        }
    }

    #[tokio::test]
    async fn test_replay_resolves_history_room() {
        let state = test_state("replay").await;
        let outcome = resolve(&state, ResolutionOrigin::SearchBar, Platform::Douyu, "9999").await;
        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));

        // no player configured, the link is still consumed and recorded
        assert!(play_link(&state, 0).await.is_err());
        let history = crate::handlers::history::get_history(&state).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].room_id, 9999);

        match replay(&state, 0).await.unwrap() {
            ResolveOutcome::Resolved(result) => {
                assert_eq!(result.platform, Platform::Douyu);
                assert_eq!(result.room_id, 9999);
                assert_eq!(result.links.len(), 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replay_unknown_index() {
        let state = test_state("unknown").await;
        assert!(replay(&state, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_bilibili_without_cookie() {
        let state = test_state("bilibili").await;
        let outcome = resolve(&state, ResolutionOrigin::SearchBar, Platform::Bilibili, "6").await;
        assert_eq!(outcome, ResolveOutcome::ConfigurationRequired(Platform::Bilibili));

        crate::handlers::config::set_bilibili_cookie(&state, "SESSDATA=abc")
            .await
            .unwrap();
        let outcome = resolve(&state, ResolutionOrigin::SearchBar, Platform::Bilibili, "6").await;
        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
    }

    #[tokio::test]
    async fn test_delete_history_entry() {
        let state = test_state("delete").await;
        resolve(&state, ResolutionOrigin::SearchBar, Platform::Bigo, "52").await;
        let _ = play_link(&state, 1).await;
        let id = crate::handlers::history::get_history(&state).await.unwrap()[0].id;

        crate::handlers::history::delete_history(&state, id)
            .await
            .unwrap();
        assert!(crate::handlers::history::get_history(&state)
            .await
            .unwrap()
            .is_empty());
        assert!(crate::handlers::history::delete_history(&state, id)
            .await
            .is_err());
    }
}
