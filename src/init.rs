use crate::error::SetupError;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const REQUIRED_DIRS: &[&str] = &[
    "video_to_split",
    "audio_in",
    "transcripts",
    "video_out",
    "processing",
    "temp_chunks",
];

/// Creates every directory under `root`, parents included. Returns the ones that did not
/// exist before. A non-directory already sitting at one of the paths is an error.
pub async fn ensure_directories<S: AsRef<str>>(
    root: &Path,
    dirs: &[S],
) -> Result<Vec<PathBuf>, SetupError> {
    let mut created = Vec::new();
    for dir in dirs {
        let path = root.join(dir.as_ref());
        let existed = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
        fs::create_dir_all(&path)
            .await
            .map_err(|source| SetupError::Directory {
                path: path.clone(),
                source,
            })?;
        if !existed {
            created.push(path);
        }
    }
    Ok(created)
}

pub async fn check_tool(name: &str) -> bool {
    match tokio::process::Command::new(name)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}

fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    Some((key.trim(), value))
}

/// Keys from `keys` that the dotenv file at `path` leaves unset or empty.
pub async fn missing_env_keys<S: AsRef<str>>(path: &Path, keys: &[S]) -> Vec<String> {
    let content = fs::read_to_string(path).await.unwrap_or_default();
    keys.iter()
        .map(|k| k.as_ref())
        .filter(|key| {
            !content
                .lines()
                .filter_map(parse_env_line)
                .any(|(k, v)| k == *key && !v.is_empty())
        })
        .map(str::to_string)
        .collect()
}
