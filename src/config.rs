//! Renderer configuration.
//!
//! Settings come from an optional YAML file; command-line flags override it.
//!
//! ```yaml
//! api_base_url: https://api.begonoaja.site/api
//! default_image: /static/default-image.jpg
//! ```

use crate::error::Result;
use crate::metadata::DEFAULT_IMAGE;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_API_BASE_URL: &str = "https://api.begonoaja.site/api";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontConfig {
    /// Base URL of the news API; requests go to `{api_base_url}/news`.
    pub api_base_url: String,
    /// Image for `og:image` / `twitter:image` when an article has none.
    pub default_image: String,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl FrontConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Load a YAML config file; missing keys take their defaults.
#[instrument(level = "info")]
pub async fn load_config(path: &str) -> Result<FrontConfig> {
    let yaml = fs::read_to_string(path).await?;
    let config = FrontConfig::from_yaml(&yaml)?;
    info!(api_base_url = %config.api_base_url, "Loaded configuration");
    Ok(config)
}
