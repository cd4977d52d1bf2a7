//! TOML + environment configuration for the dispatcher.
//!
//! The file supplies the rotation pools and the endpoint; environment
//! variables overlay both, so deployments can inject credentials without a
//! config file on disk.

use std::time::Duration;
use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use sage_types::{CredentialKey, ModelId};

const ENV_CREDENTIAL_PREFIX: &str = "SAGE_API_KEY_";
const ENV_MODEL_PREFIX: &str = "SAGE_MODEL_";
const ENV_BASE_URL: &str = "SAGE_API_BASE_URL";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Default, Deserialize)]
pub struct SageConfig {
    pub api: Option<ApiConfig>,
    pub pools: Option<PoolsConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    /// OpenAI-compatible base URL; defaults to the Groq endpoint.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Default, Deserialize)]
pub struct PoolsConfig {
    /// Credential tokens in rotation order. Empty entries are kept: an
    /// unconfigured slot fails on its turn and rotation moves past it.
    #[serde(default)]
    pub credentials: Vec<String>,
    /// Model identifiers eligible for the random pick.
    #[serde(default)]
    pub models: Vec<String>,
}

// Manual Debug impl to prevent leaking credentials in logs.
impl std::fmt::Debug for PoolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolsConfig")
            .field(
                "credentials",
                &format_args!("[{} slot(s)]", self.credentials.len()),
            )
            .field("models", &self.models)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl SageConfig {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Overlay the process environment: `SAGE_API_KEY_{n}` and
    /// `SAGE_MODEL_{n}` (consecutive from 1) replace the file pools when
    /// present; `SAGE_API_BASE_URL` overrides the endpoint.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| env::var(name).ok());
    }

    /// Same as [`SageConfig::apply_env`] with an injected lookup, so tests
    /// never mutate process state.
    pub fn apply_env_with(&mut self, get: impl Fn(&str) -> Option<String>) {
        let credentials = collect_numbered(&get, ENV_CREDENTIAL_PREFIX);
        if !credentials.is_empty() {
            self.pools_mut().credentials = credentials;
        }
        let models = collect_numbered(&get, ENV_MODEL_PREFIX);
        if !models.is_empty() {
            self.pools_mut().models = models;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.api_mut().base_url = Some(base_url);
        }
    }

    /// The pools as typed rotation inputs. Empty slots are preserved.
    #[must_use]
    pub fn rotation_pools(&self) -> (Vec<CredentialKey>, Vec<ModelId>) {
        let Some(pools) = self.pools.as_ref() else {
            return (Vec::new(), Vec::new());
        };
        let credentials = pools
            .credentials
            .iter()
            .map(|token| CredentialKey::new(token.clone()))
            .collect();
        let models = pools.models.iter().map(|id| ModelId::new(id.clone())).collect();
        (credentials, models)
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|api| api.base_url.as_deref())
            .unwrap_or(sage_providers::GROQ_OPENAI_BASE_URL)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .api
            .as_ref()
            .and_then(|api| api.timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    fn pools_mut(&mut self) -> &mut PoolsConfig {
        self.pools.get_or_insert_with(PoolsConfig::default)
    }

    fn api_mut(&mut self) -> &mut ApiConfig {
        self.api.get_or_insert_with(ApiConfig::default)
    }
}

fn collect_numbered(get: &impl Fn(&str) -> Option<String>, prefix: &str) -> Vec<String> {
    let mut values = Vec::new();
    for n in 1.. {
        match get(&format!("{prefix}{n}")) {
            // Present-but-empty stays in the pool as a fail-forward slot.
            Some(value) => values.push(value),
            None => break,
        }
    }
    values
}
