use crate::config::SetupConfig;
use crate::error::SetupError;
use crate::manifest::{Manifest, normalize_name};
use crate::logi;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

fn pip(config: &SetupConfig, root: &Path) -> Command {
    let mut cmd = Command::new(&config.python);
    cmd.arg("-m").arg("pip").current_dir(root);
    cmd
}

/// Runs `pip install -r <manifest>`, letting pip's own output through.
pub async fn install(config: &SetupConfig, root: &Path, manifest: &Path) -> Result<(), SetupError> {
    match fs::metadata(manifest).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(SetupError::ManifestMissing(manifest.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SetupError::ManifestMissing(manifest.to_path_buf()));
        }
        Err(source) => {
            return Err(SetupError::ManifestRead {
                path: manifest.to_path_buf(),
                source,
            });
        }
    }

    logi(format!(
        "Installing dependencies from {} with {}",
        manifest.display(),
        config.python
    ));

    let status = pip(config, root)
        .arg("install")
        .arg("-r")
        .arg(manifest)
        .status()
        .await
        .map_err(|source| SetupError::Spawn {
            program: config.python.clone(),
            source,
        })?;

    if !status.success() {
        return Err(SetupError::InstallFailed {
            code: status.code(),
        });
    }

    Ok(())
}

pub async fn installed_packages(config: &SetupConfig, root: &Path) -> Result<Vec<InstalledPackage>> {
    let output = pip(config, root)
        .args(["list", "--format=json", "--disable-pip-version-check"])
        .output()
        .await
        .with_context(|| format!("Failed to run {} -m pip list", config.python))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pip list failed: {}", stderr.trim());
    }

    let packages: Vec<InstalledPackage> =
        serde_json::from_slice(&output.stdout).context("Failed to parse pip list output")?;
    Ok(packages)
}

/// Manifest requirements whose name does not appear in `installed`. Requirements carrying
/// an environment marker are skipped since markers are not evaluated here.
pub fn missing_packages(manifest: &Manifest, installed: &[InstalledPackage]) -> Vec<String> {
    let present: HashSet<String> = installed.iter().map(|p| normalize_name(&p.name)).collect();
    manifest
        .requirements
        .iter()
        .filter(|r| r.marker.is_none())
        .filter(|r| !present.contains(&r.normalized_name()))
        .map(|r| r.name.clone())
        .collect()
}
