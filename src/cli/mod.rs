use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[value(name = "gemini-3-pro-preview", alias = "3-pro")]
    #[serde(rename = "gemini-3-pro-preview")]
    Gemini3Pro,
    #[value(name = "gemini-2.5-pro", alias = "2.5-pro")]
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[value(name = "gemini-2.5-flash", alias = "2.5-flash")]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [ModelId::Gemini3Pro, ModelId::Gemini25Pro, ModelId::Gemini25Flash];

    /// Identifier sent to the generation API.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::Gemini3Pro => "gemini-3-pro-preview",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
            ModelId::Gemini25Flash => "gemini-2.5-flash",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelId::Gemini3Pro => "Gemini 3.0 Pro",
            ModelId::Gemini25Pro => "Gemini 2.5 Pro",
            ModelId::Gemini25Flash => "Gemini 2.5 Flash",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelId::Gemini3Pro => "Max reasoning & complexity",
            ModelId::Gemini25Pro => "Balanced high-performance",
            ModelId::Gemini25Flash => "High speed optimization",
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Parser, Debug)]
#[command(name = "mobius_prime", version, about = "System prompt engineering wizard backed by Gemini")]
pub struct Args {
    #[arg(long, value_enum)]
    pub model: Option<ModelId>,

    /// Manual API key; takes precedence over platform and environment keys.
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value_t = false)]
    pub no_keyring: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
