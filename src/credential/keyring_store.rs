use anyhow::{anyhow, Result};
use async_trait::async_trait;
use keyring::Entry;
use std::sync::Arc;

use super::KeyCapability;
use crate::ux::{self, SecretInput};

const KEYRING_USERNAME: &str = "gemini_api_key";

/// Platform key capability backed by the OS keychain. Keychain access and
/// the key prompt both block, so they run on the blocking pool.
pub struct KeyringCapability {
    service: String,
    input: Arc<dyn SecretInput>,
}

impl KeyringCapability {
    pub fn new(service: impl Into<String>, input: Arc<dyn SecretInput>) -> Self {
        Self {
            service: service.into(),
            input,
        }
    }
}

fn entry(service: &str) -> Result<Entry, keyring::Error> {
    Entry::new(service, KEYRING_USERNAME)
}

fn read(service: &str) -> Result<Option<String>> {
    match entry(service)?.get_password() {
        Ok(key) => Ok(Some(key)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl KeyCapability for KeyringCapability {
    async fn has_selected_key(&self) -> Result<bool> {
        Ok(self.selected_key().await?.is_some())
    }

    async fn open_select_key(&self) -> Result<()> {
        let service = self.service.clone();
        let input = Arc::clone(&self.input);
        tokio::task::spawn_blocking(move || -> Result<()> {
            let key = ux::read_api_key(input.as_ref(), "Key to store in the system keychain")?
                .ok_or_else(|| anyhow!("no key entered"))?;
            entry(&service)?.set_password(&key)?;
            Ok(())
        })
        .await?
    }

    async fn selected_key(&self) -> Result<Option<String>> {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || read(&service)).await?
    }
}
