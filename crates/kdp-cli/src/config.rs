//! Environment configuration
//!
//! | Variable                      | Default                                            |
//! |-------------------------------|----------------------------------------------------|
//! | `KDP_DATA_DIR`                | platform data dir (`com.kdp.core`)                 |
//! | `KDP_GEMINI_API_KEY`          | unset: keyword fallback only                       |
//! | `KDP_GEMINI_MODEL`            | `gemini-1.5-flash`                                 |
//! | `KDP_GEMINI_BASE_URL`         | `https://generativelanguage.googleapis.com/v1beta` |
//! | `KDP_SUMMARIZER_TIMEOUT_SECS` | `20`                                               |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kdp_core::storage::{default_data_dir, DB_FILE_NAME};
use kdp_core::Summarizer;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Runtime configuration for the `kdp` binary
#[derive(Debug, Clone)]
pub struct KdpConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub summarizer_timeout: Duration,
}

impl KdpConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let summarizer_timeout = match get("KDP_SUMMARIZER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    anyhow::anyhow!("Invalid KDP_SUMMARIZER_TIMEOUT_SECS '{}': {}", raw, e)
                })?;
                if secs == 0 {
                    anyhow::bail!("KDP_SUMMARIZER_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            data_dir: get("KDP_DATA_DIR").map(PathBuf::from),
            gemini_api_key: get("KDP_GEMINI_API_KEY"),
            gemini_model: get("KDP_GEMINI_MODEL"),
            gemini_base_url: get("KDP_GEMINI_BASE_URL"),
            summarizer_timeout,
        })
    }

    /// Path of the SQLite database file
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        Ok(dir.join(DB_FILE_NAME))
    }

    /// The configured summarizer, if an API key is present
    #[cfg(feature = "gemini")]
    pub fn summarizer(&self) -> Option<Arc<dyn Summarizer>> {
        use kdp_core::{GeminiConfig, GeminiSummarizer};

        let api_key = self.gemini_api_key.as_ref()?;
        let mut config = GeminiConfig::new(api_key.clone());
        if let Some(model) = &self.gemini_model {
            config.model = model.clone();
        }
        if let Some(base_url) = &self.gemini_base_url {
            config.base_url = base_url.clone();
        }
        config.timeout = self.summarizer_timeout;
        Some(Arc::new(GeminiSummarizer::new(config)))
    }

    #[cfg(not(feature = "gemini"))]
    pub fn summarizer(&self) -> Option<Arc<dyn Summarizer>> {
        if self.gemini_api_key.is_some() {
            tracing::warn!("KDP_GEMINI_API_KEY is set but gemini support is not compiled in");
        }
        None
    }
}
