use crate::error::SetupError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::debug;

static REQUIREMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?:@\s*(?P<url>\S+)\s*)?(?P<spec>(?:(?:===|==|!=|~=|>=|<=|>|<)\s*[^\s,;]+\s*,?\s*)*)(?:;\s*(?P<marker>.+))?$",
    )
    .expect("requirement regex")
});

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_.]+").expect("separator regex"));

/// PEP 503 form used to compare package names.
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RE
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub spec: Option<String>,
    pub url: Option<String>,
    pub marker: Option<String>,
}

impl Requirement {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub requirements: Vec<Requirement>,
    /// Lines such as `-r other.txt`, `--index-url ...`, bare archive paths and URLs, or
    /// anything else not read as a requirement. Left for pip to interpret.
    pub options: Vec<String>,
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Drops per-requirement options such as `--hash=sha256:...`.
fn strip_requirement_options(line: &str) -> &str {
    match line.find(" --").or_else(|| line.find("\t--")) {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}

/// Bare paths and URLs name no package up front. `name @ url` does.
fn is_direct_reference(line: &str) -> bool {
    if line.starts_with('.') || line.starts_with('/') {
        return true;
    }
    match line.find("://") {
        Some(idx) => !line[..idx].contains('@'),
        None => false,
    }
}

/// Joins `\`-continued lines, keeping the number of the line each logical line starts on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let (start, mut acc) = pending.take().unwrap_or((idx + 1, String::new()));
        match raw.strip_suffix('\\') {
            Some(head) => {
                acc.push_str(head);
                acc.push(' ');
                pending = Some((start, acc));
            }
            None => {
                acc.push_str(raw);
                lines.push((start, acc));
            }
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

impl Manifest {
    pub async fn load(path: &Path) -> Result<Self, SetupError> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SetupError::ManifestMissing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(SetupError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self::parse(&text))
    }

    /// Best-effort read of a requirements file. pip stays the authority on the format:
    /// anything not recognised as `name[extras] spec ; marker` is kept in `options`.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Manifest::default();

        for (line_no, joined) in logical_lines(text) {
            let line = strip_comment(&joined).trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('-') || is_direct_reference(line) {
                manifest.options.push(line.to_string());
                continue;
            }

            let Some(caps) = REQUIREMENT_RE.captures(strip_requirement_options(line)) else {
                debug!(line = line_no, content = line, "leaving requirement line to pip");
                manifest.options.push(line.to_string());
                continue;
            };

            let extras = caps
                .name("extras")
                .map(|m| {
                    m.as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            let spec = caps
                .name("spec")
                .map(|m| m.as_str().split_whitespace().collect::<String>())
                .filter(|s| !s.is_empty());
            let url = caps.name("url").map(|m| m.as_str().to_string());
            let marker = caps.name("marker").map(|m| m.as_str().trim().to_string());

            manifest.requirements.push(Requirement {
                name: caps["name"].to_string(),
                extras,
                spec,
                url,
                marker,
            });
        }

        manifest
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty() && self.options.is_empty()
    }
}
