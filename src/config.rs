use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

pub const CONFIG_FILE: &str = "setup.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_env_file")]
    pub env_file: String,
    #[serde(default = "default_env_keys")]
    pub required_env_keys: Vec<String>,
    #[serde(default = "default_tools")]
    pub required_tools: Vec<String>,
    #[serde(default = "default_verify_install")]
    pub verify_install: bool,
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_python() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_env_keys() -> Vec<String> {
    vec!["GEMINI_API_KEY".to_string(), "OPENAI_API_KEY".to_string()]
}

fn default_tools() -> Vec<String> {
    vec!["ffmpeg".to_string(), "ffprobe".to_string()]
}

fn default_verify_install() -> bool {
    true
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            python: default_python(),
            env_file: default_env_file(),
            required_env_keys: default_env_keys(),
            required_tools: default_tools(),
            verify_install: default_verify_install(),
        }
    }
}

impl SetupConfig {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: SetupConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;

        if config.manifest.trim().is_empty() {
            anyhow::bail!("{CONFIG_FILE}: manifest must not be empty");
        }
        if config.python.trim().is_empty() {
            anyhow::bail!("{CONFIG_FILE}: python must not be empty");
        }

        Ok(config)
    }

    /// Reads `setup.json` from `root` when present, otherwise the built-in defaults.
    pub async fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        match fs::metadata(&path).await {
            Ok(_) => Self::load(&path).await,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to stat config: {}", path.display())),
        }
    }
}
