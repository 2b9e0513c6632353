use crate::config::PlayerConfig;

/// Launches the configured player on `url` without waiting for it to exit.
pub async fn play(player: &PlayerConfig, url: &str) -> Result<(), String> {
    if player.path.is_empty() {
        return Err("Player is not configured, run `lsar config set-player <path>`".to_string());
    }
    log::info!("Attempting to play URL: {}", url);
    tokio::process::Command::new(&player.path)
        .args(&player.args)
        .arg(url)
        .spawn()
        .map_err(|e| format!("Failed to start player {}: {}", player.path, e))?;
    Ok(())
}

/// Opens `url` in the default browser.
pub fn open_external(url: &str) -> Result<(), String> {
    log::info!("Opening external URL: {}", url);
    open::that(url).map_err(|e| format!("Failed to open {}: {}", url, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_play_without_player() {
        let err = play(&PlayerConfig::default(), "https://a.flv")
            .await
            .unwrap_err();
        assert!(err.contains("set-player"));
    }

    #[tokio::test]
    async fn test_play_missing_binary() {
        let player = PlayerConfig {
            path: "/nonexistent/lsar-player".to_string(),
            args: vec![],
        };
        assert!(play(&player, "https://a.flv").await.is_err());
    }
}
