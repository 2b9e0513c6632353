use std::sync::Arc;

use async_trait::async_trait;
use resolver::platforms::{Platform, PlatformCredentials};
use resolver::traits::CredentialStore;
use tokio::sync::RwLock;

use crate::config::Config;

/// Reads platform secrets from the loaded config.
pub struct ConfigCredentials {
    config: Arc<RwLock<Config>>,
}

impl ConfigCredentials {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CredentialStore for ConfigCredentials {
    async fn read_credential(&self, platform: Platform) -> PlatformCredentials {
        match platform {
            Platform::Bilibili => {
                PlatformCredentials::with_cookie(&self.config.read().await.platform.bilibili.cookie)
            }
            _ => PlatformCredentials::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_bilibili_has_cookie() {
        let path = std::env::temp_dir()
            .join(format!("lsar-test-credentials-{}", std::process::id()))
            .join("Conf.toml");
        let _ = std::fs::remove_file(&path);
        let mut config = Config::load_from(&path).unwrap();
        config.set_bilibili_cookie("SESSDATA=abc").unwrap();

        let store = ConfigCredentials::new(Arc::new(RwLock::new(config)));
        assert_eq!(
            store.read_credential(Platform::Bilibili).await.cookie(),
            Some("SESSDATA=abc")
        );
        assert_eq!(store.read_credential(Platform::Douyu).await.cookie(), None);
    }
}
