use crate::config::Config;
use crate::state::State;

pub async fn get_config(state: &State) -> Config {
    state.config.read().await.clone()
}

pub async fn set_bilibili_cookie(state: &State, cookie: &str) -> Result<(), String> {
    state.config.write().await.set_bilibili_cookie(cookie)?;
    log::info!("Bilibili cookie updated");
    Ok(())
}

pub async fn set_player(state: &State, path: &str, args: Vec<String>) -> Result<(), String> {
    state.config.write().await.set_player(path, args)?;
    log::info!("Player changed: {}", path);
    Ok(())
}
