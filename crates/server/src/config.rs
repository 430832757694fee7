use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use server_api::{ProxyConfig, SheetCredentials, DEFAULT_RANGE, DEFAULT_TAB, DEFAULT_UPSTREAM_BASE};
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub sheet_id: Option<String>,
    pub api_key: Option<String>,
    pub upstream_base_url: String,
    pub require_tab_param: bool,
    pub default_tab: Option<String>,
    pub range: Option<String>,
    pub allowed_tabs: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8888".into(),
            sheet_id: None,
            api_key: None,
            upstream_base_url: DEFAULT_UPSTREAM_BASE.into(),
            require_tab_param: false,
            default_tab: Some(DEFAULT_TAB.into()),
            range: Some(DEFAULT_RANGE.into()),
            allowed_tabs: Vec::new(),
        }
    }
}

/// `server.toml` keys. Absent keys keep the defaults; an empty
/// `default_tab` or `range` string clears the value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    bind_addr: Option<String>,
    sheet_id: Option<String>,
    api_key: Option<String>,
    upstream_base_url: Option<String>,
    require_tab_param: Option<bool>,
    default_tab: Option<String>,
    range: Option<String>,
    allowed_tabs: Option<Vec<String>>,
}

impl Settings {
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            require_tab_param: self.require_tab_param,
            default_tab: self.default_tab.clone(),
            range: self.range.clone(),
            allowed_tabs: self.allowed_tabs.clone(),
        }
    }

    pub fn credentials(&self) -> Option<SheetCredentials> {
        SheetCredentials::from_parts(self.sheet_id.clone(), self.api_key.clone())
    }

    pub fn upstream_base(&self) -> anyhow::Result<Url> {
        Url::parse(&self.upstream_base_url)
            .with_context(|| format!("invalid upstream base url '{}'", self.upstream_base_url))
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.bind_addr {
            self.server_bind = v;
        }
        if let Some(v) = file.sheet_id {
            self.sheet_id = Some(v);
        }
        if let Some(v) = file.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = file.upstream_base_url {
            self.upstream_base_url = v;
        }
        if let Some(v) = file.require_tab_param {
            self.require_tab_param = v;
        }
        if let Some(v) = file.default_tab {
            self.default_tab = non_empty(v);
        }
        if let Some(v) = file.range {
            self.range = non_empty(v);
        }
        if let Some(v) = file.allowed_tabs {
            self.allowed_tabs = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Later keys take precedence over earlier ones.
        let last_set = |keys: &[&str]| keys.iter().rev().find_map(|key| lookup(key));

        if let Some(v) = last_set(&["SERVER_BIND", "APP__BIND_ADDR"]) {
            self.server_bind = v;
        }
        if let Some(v) = last_set(&["SHEET_ID", "APP__SHEET_ID"]) {
            self.sheet_id = Some(v);
        }
        if let Some(v) = last_set(&["API_KEY", "APP__API_KEY"]) {
            self.api_key = Some(v);
        }
        if let Some(v) = last_set(&["APP__UPSTREAM_BASE_URL"]) {
            self.upstream_base_url = v;
        }
        if let Some(v) = last_set(&["APP__REQUIRE_TAB_PARAM"]) {
            match parse_bool(&v) {
                Some(parsed) => self.require_tab_param = parsed,
                None => warn!(value = %v, "ignoring unparsable APP__REQUIRE_TAB_PARAM"),
            }
        }
        if let Some(v) = last_set(&["APP__DEFAULT_TAB"]) {
            self.default_tab = non_empty(v);
        }
        if let Some(v) = last_set(&["APP__RANGE"]) {
            self.range = non_empty(v);
        }
        if let Some(v) = last_set(&["APP__ALLOWED_TABS"]) {
            self.allowed_tabs = v
                .split(',')
                .map(str::trim)
                .filter(|tab| !tab.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

/// Defaults, then `server.toml` in the working directory, then environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        settings.apply_file(file_cfg);
    }

    settings.apply_env(lookup);
    Ok(settings)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
