//! Credential resolution.
//!
//! A key can come from three places: a manually entered string, a host
//! capability (the OS keyring here), or a process environment variable.
//! The manual key always wins at call time; the other two collapse into a
//! single "ambient" key.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub mod keyring_store;

/// A manual key is usable once it is longer than this.
pub const MANUAL_KEY_MIN_LEN: usize = 10;

/// Host-provided key selection capability.
#[async_trait]
pub trait KeyCapability: Send + Sync {
    async fn has_selected_key(&self) -> Result<bool>;
    /// Lets the user pick a key out-of-band.
    async fn open_select_key(&self) -> Result<()>;
    async fn selected_key(&self) -> Result<Option<String>>;
}

pub type DynCapability = Box<dyn KeyCapability>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    PlatformKey,
    EnvironmentKey,
    ManualKey(String),
}

impl Credential {
    /// Safe to log; never includes the key itself.
    pub fn source(&self) -> &'static str {
        match self {
            Credential::PlatformKey => "platform",
            Credential::EnvironmentKey => "environment",
            Credential::ManualKey(_) => "manual",
        }
    }
}

pub struct CredentialResolver {
    capability: Option<DynCapability>,
    platform_key_present: bool,
    env_key: Option<String>,
}

impl CredentialResolver {
    /// Probes the capability first, then the environment. A missing or
    /// failing capability is not an error.
    pub async fn init(capability: Option<DynCapability>, env_key: Option<String>) -> Self {
        let mut platform_key_present = false;
        if let Some(cap) = &capability {
            match cap.has_selected_key().await {
                Ok(has) => platform_key_present = has,
                Err(e) => debug!("key capability check failed: {e:#}"),
            }
        }
        Self {
            capability,
            platform_key_present,
            env_key: env_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    pub fn platform_or_env_present(&self) -> bool {
        self.platform_key_present || self.env_key.is_some()
    }

    pub fn is_ready(&self, manual_key: &str) -> bool {
        self.platform_or_env_present() || manual_key.chars().count() > MANUAL_KEY_MIN_LEN
    }

    /// Defers to the capability; marks the platform key present once the
    /// user has been through selection. No-op without a capability.
    pub async fn request_platform_key(&mut self) -> Result<()> {
        let Some(cap) = &self.capability else {
            return Ok(());
        };
        cap.open_select_key().await?;
        self.platform_key_present = true;
        Ok(())
    }

    /// Which credential a call would use right now.
    pub fn resolve(&self, manual_key: &str) -> Option<Credential> {
        if !manual_key.is_empty() {
            Some(Credential::ManualKey(manual_key.to_string()))
        } else if self.platform_key_present {
            Some(Credential::PlatformKey)
        } else if self.env_key.is_some() {
            Some(Credential::EnvironmentKey)
        } else {
            None
        }
    }

    /// The non-manual key value: the platform-selected key if the
    /// capability yields one, else the environment value.
    pub async fn ambient_key(&self) -> Option<String> {
        if self.platform_key_present {
            if let Some(cap) = &self.capability {
                match cap.selected_key().await {
                    Ok(Some(key)) if !key.is_empty() => return Some(key),
                    Ok(_) => {}
                    Err(e) => debug!("reading platform key failed: {e:#}"),
                }
            }
        }
        self.env_key.clone()
    }
}
