use crate::config::{CONFIG_FILE, SetupConfig};
use crate::error::SetupError;
use crate::init;
use crate::installer;
use crate::manifest::Manifest;
use crate::{logi, logok, logw};
use std::path::Path;
use tracing::debug;

/// Loads `setup.json` (if any) from `root` and runs the setup there.
pub async fn run_setup(root: &Path) -> Result<(), SetupError> {
    let config = SetupConfig::load_or_default(root)
        .await
        .map_err(|e| SetupError::Config {
            path: root.join(CONFIG_FILE),
            message: format!("{e:#}"),
        })?;
    run_with_config(root, &config).await
}

pub async fn run_with_config(root: &Path, config: &SetupConfig) -> Result<(), SetupError> {
    debug!(?config, root = %root.display(), "starting setup");

    let created = init::ensure_directories(root, init::REQUIRED_DIRS).await?;
    for dir in &created {
        logi(format!("Created directory: {}", dir.display()));
    }
    if created.is_empty() {
        debug!("all directories already present");
    }

    preflight(root, config).await;

    let manifest_path = root.join(&config.manifest);
    installer::install(config, root, &manifest_path).await?;

    if config.verify_install {
        verify(root, config, &manifest_path).await;
    }

    debug!("setup finished");
    Ok(())
}

async fn preflight(root: &Path, config: &SetupConfig) {
    for tool in &config.required_tools {
        if !init::check_tool(tool).await {
            logw(format!("{tool} not found in PATH. Please install it."));
        }
    }

    if config.required_env_keys.is_empty() {
        return;
    }
    let env_path = root.join(&config.env_file);
    let missing = init::missing_env_keys(&env_path, &config.required_env_keys).await;
    if !missing.is_empty() {
        logw(format!(
            "{} does not set: {}",
            env_path.display(),
            missing.join(", ")
        ));
    }
}

async fn verify(root: &Path, config: &SetupConfig, manifest_path: &Path) {
    let manifest = match Manifest::load(manifest_path).await {
        Ok(manifest) => manifest,
        Err(e) => {
            logw(format!("Could not verify installed packages: {e}"));
            return;
        }
    };
    if manifest.requirements.is_empty() {
        debug!("no named requirements to verify");
        return;
    }

    match installer::installed_packages(config, root).await {
        Ok(installed) => {
            let missing = installer::missing_packages(&manifest, &installed);
            if missing.is_empty() {
                logok(format!(
                    "All {} package(s) present",
                    manifest.requirements.len()
                ));
            } else {
                logw(format!("Not found after install: {}", missing.join(", ")));
            }
        }
        Err(e) => logw(format!("Could not verify installed packages: {e:#}")),
    }
}
