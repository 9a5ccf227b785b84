use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ModelId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub model: ModelId,
    pub endpoint: String,
    /// Name of the process environment variable holding the ambient key.
    pub env_key_var: String,
    pub keyring_service: String,
    pub use_keyring: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-10-01".into(),
            model: ModelId::default(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            env_key_var: "API_KEY".into(),
            keyring_service: "mobius-prime".into(),
            use_keyring: true,
        }
    }
}

impl Config {
    /// Defaults when `path` is `None`; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(model) = args.model {
            self.model = model;
        }
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        if args.no_keyring {
            self.use_keyring = false;
        }
    }

    /// Environment credential, presence-checked only.
    pub fn env_key(&self) -> Option<String> {
        std::env::var(&self.env_key_var).ok().filter(|k| !k.is_empty())
    }
}
