use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ai::mock::{MockBehavior, MockProvider};
use crate::ai::openai::OpenAiProvider;
use crate::ai::provider::AiProvider;
use crate::ai::types::ModelParams;
use crate::assistant::Backend;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "openai")]
    OpenAi {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        behavior: MockBehavior,
    },
}

impl ProviderConfig {
    pub fn build(&self) -> Arc<dyn AiProvider> {
        match self {
            Self::OpenAi { api_key, base_url } => {
                Arc::new(OpenAiProvider::new(api_key.clone(), base_url.clone()))
            }
            Self::Mock { behavior } => Arc::new(MockProvider::new(behavior.clone())),
        }
    }
}

/// Persistent configuration. A missing active provider means demo mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the entry in `providers` used for live requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_provider: Option<String>,

    #[serde(default = "ModelParams::tutor_defaults")]
    pub tutor: ModelParams,

    #[serde(default = "ModelParams::grading_defaults")]
    pub grading: ModelParams,

    /// Summarize profile briefs that exceed the token threshold.
    #[serde(default)]
    pub compact_large_profiles: bool,

    /// Where learner memory is stored. Defaults to `~/.learncontext/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_provider: None,
            tutor: ModelParams::tutor_defaults(),
            grading: ModelParams::grading_defaults(),
            compact_large_profiles: false,
            data_dir: None,
            providers: HashMap::new(),
        }
    }
}

impl Settings {
    /// The configured provider, if the active name points at one.
    pub fn active_provider_config(&self) -> Option<&ProviderConfig> {
        let name = self.active_provider.as_ref()?;
        self.providers.get(name)
    }

    pub fn add_provider(&mut self, name: impl Into<String>, config: ProviderConfig) {
        let name = name.into();
        self.providers.insert(name.clone(), config);
        self.active_provider = Some(name);
    }

    pub fn clear_active_provider(&mut self) {
        self.active_provider = None;
    }

    pub fn backend(&self) -> Backend {
        match self.active_provider_config() {
            Some(config) => Backend::Live(config.build()),
            None => Backend::Demo,
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".learncontext").join("data"))
    }
}
