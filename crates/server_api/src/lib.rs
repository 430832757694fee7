use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::ApiError;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_UPSTREAM_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_TAB: &str = "Writers";
pub const DEFAULT_RANGE: &str = "A1:Z1000";

const MISSING_CREDENTIALS: &str =
    "Missing API credentials. Check the SHEET_ID and API_KEY environment variables.";
const MISSING_TAB: &str = "Request is missing the 'tab' query parameter.";

/// Shapes the request contract of the sheet proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// When set, a missing or blank `tab` is rejected instead of falling back to `default_tab`.
    pub require_tab_param: bool,
    pub default_tab: Option<String>,
    /// A1 range appended to the tab; `None` fetches the whole sheet.
    pub range: Option<String>,
    /// Empty means any tab name is forwarded.
    pub allowed_tabs: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            require_tab_param: false,
            default_tab: Some(DEFAULT_TAB.into()),
            range: Some(DEFAULT_RANGE.into()),
            allowed_tabs: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SheetCredentials {
    pub sheet_id: String,
    pub api_key: String,
}

impl SheetCredentials {
    /// Both values must be present and non-blank.
    pub fn from_parts(sheet_id: Option<String>, api_key: Option<String>) -> Option<Self> {
        let sheet_id = sheet_id.filter(|v| !v.trim().is_empty())?;
        let api_key = api_key.filter(|v| !v.trim().is_empty())?;
        Some(Self { sheet_id, api_key })
    }
}

impl std::fmt::Debug for SheetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCredentials")
            .field("sheet_id", &self.sheet_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_json(&self, url: &Url) -> Result<serde_json::Value, ApiError>;
}

/// Fetches sheet values over HTTPS.
#[derive(Clone, Default)]
pub struct HttpSheetSource {
    http: Client,
}

impl HttpSheetSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_json(&self, url: &Url) -> Result<serde_json::Value, ApiError> {
        // reqwest errors embed the request URL, which carries the API key.
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::upstream(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::upstream(format!(
                "Google Sheets API error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::upstream(e.without_url().to_string()))
    }
}

#[derive(Clone)]
pub struct ProxyContext {
    pub config: ProxyConfig,
    pub credentials: Option<SheetCredentials>,
    pub upstream_base: Url,
    pub source: Arc<dyn SheetSource>,
}

/// Picks the tab to fetch per `config`, or explains why the request is invalid.
pub fn resolve_tab(config: &ProxyConfig, requested: Option<&str>) -> Result<String, ApiError> {
    let requested = requested.map(str::trim).filter(|tab| !tab.is_empty());
    let tab = match requested {
        Some(tab) => tab.to_string(),
        None if config.require_tab_param => return Err(ApiError::validation(MISSING_TAB)),
        None => config
            .default_tab
            .clone()
            .ok_or_else(|| ApiError::validation(MISSING_TAB))?,
    };

    if !config.allowed_tabs.is_empty() && !config.allowed_tabs.iter().any(|t| *t == tab) {
        return Err(ApiError::validation(format!("Unknown tab '{tab}'.")));
    }
    Ok(tab)
}

pub fn build_upstream_url(
    base: &Url,
    credentials: &SheetCredentials,
    tab: &str,
    range: Option<&str>,
) -> Result<Url, ApiError> {
    let mut url = base.clone();
    let target = match range {
        Some(range) => format!("{tab}!{range}"),
        None => tab.to_string(),
    };
    url.path_segments_mut()
        .map_err(|_| ApiError::configuration("upstream base URL cannot carry a path"))?
        .pop_if_empty()
        .push(&credentials.sheet_id)
        .push("values")
        .push(&target);
    url.query_pairs_mut()
        .clear()
        .append_pair("key", &credentials.api_key);
    Ok(url)
}

pub async fn fetch_tab(
    ctx: &ProxyContext,
    requested_tab: Option<&str>,
) -> Result<serde_json::Value, ApiError> {
    let Some(credentials) = ctx.credentials.as_ref() else {
        warn!("sheet proxy called without configured credentials");
        return Err(ApiError::configuration(MISSING_CREDENTIALS));
    };

    let tab = resolve_tab(&ctx.config, requested_tab)?;
    let url = build_upstream_url(
        &ctx.upstream_base,
        credentials,
        &tab,
        ctx.config.range.as_deref(),
    )?;

    debug!(%tab, range = ?ctx.config.range, "fetching sheet values");
    ctx.source.fetch_json(&url).await.inspect_err(|err| {
        warn!(%tab, error = %err.message, "upstream sheet fetch failed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use std::sync::Mutex;

    struct RecordingSource {
        urls: Mutex<Vec<String>>,
        reply: Result<serde_json::Value, ApiError>,
    }

    impl RecordingSource {
        fn ok(value: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                reply: Ok(value),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                reply: Err(ApiError::upstream(message)),
            })
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl SheetSource for RecordingSource {
        async fn fetch_json(&self, url: &Url) -> Result<serde_json::Value, ApiError> {
            self.urls.lock().expect("lock").push(url.to_string());
            self.reply.clone()
        }
    }

    fn credentials() -> SheetCredentials {
        SheetCredentials {
            sheet_id: "sheet-123".into(),
            api_key: "key-abc".into(),
        }
    }

    fn context(config: ProxyConfig, source: Arc<RecordingSource>) -> ProxyContext {
        ProxyContext {
            config,
            credentials: Some(credentials()),
            upstream_base: Url::parse("https://sheets.example.test/v4/spreadsheets")
                .expect("url"),
            source,
        }
    }

    #[test]
    fn credentials_require_both_non_blank_values() {
        assert!(SheetCredentials::from_parts(Some("id".into()), Some("key".into())).is_some());
        assert!(SheetCredentials::from_parts(None, Some("key".into())).is_none());
        assert!(SheetCredentials::from_parts(Some("id".into()), Some("  ".into())).is_none());
    }

    #[test]
    fn credentials_debug_hides_api_key() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("key-abc"));
    }

    #[test]
    fn builds_ranged_and_whole_sheet_urls() {
        let base = Url::parse("https://sheets.example.test/v4/spreadsheets/").expect("url");
        let ranged =
            build_upstream_url(&base, &credentials(), "Writers", Some("A1:Z1000")).expect("url");
        assert_eq!(
            ranged.as_str(),
            "https://sheets.example.test/v4/spreadsheets/sheet-123/values/Writers!A1:Z1000?key=key-abc"
        );

        let whole = build_upstream_url(&base, &credentials(), "Books", None).expect("url");
        assert_eq!(
            whole.as_str(),
            "https://sheets.example.test/v4/spreadsheets/sheet-123/values/Books?key=key-abc"
        );
    }

    #[test]
    fn tab_names_are_encoded_as_a_single_path_segment() {
        let base = Url::parse("https://sheets.example.test/v4/spreadsheets").expect("url");
        let url = build_upstream_url(&base, &credentials(), "a/b?c", None).expect("url");
        assert_eq!(
            url.as_str(),
            "https://sheets.example.test/v4/spreadsheets/sheet-123/values/a%2Fb%3Fc?key=key-abc"
        );
    }

    #[test]
    fn resolve_tab_honours_required_and_default_modes() {
        let optional = ProxyConfig::default();
        assert_eq!(resolve_tab(&optional, None).expect("tab"), "Writers");
        assert_eq!(resolve_tab(&optional, Some("  ")).expect("tab"), "Writers");
        assert_eq!(resolve_tab(&optional, Some("Books")).expect("tab"), "Books");

        let required = ProxyConfig {
            require_tab_param: true,
            default_tab: None,
            range: None,
            allowed_tabs: Vec::new(),
        };
        let err = resolve_tab(&required, None).expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[test]
    fn resolve_tab_checks_allow_list_when_configured() {
        let config = ProxyConfig {
            allowed_tabs: vec!["Writers".into(), "Books".into()],
            ..ProxyConfig::default()
        };
        assert!(resolve_tab(&config, Some("Books")).is_ok());
        let err = resolve_tab(&config, Some("Secrets")).expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(err.message.contains("Secrets"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_upstream_call() {
        let source = RecordingSource::ok(serde_json::json!({}));
        let mut ctx = context(ProxyConfig::default(), source.clone());
        ctx.credentials = None;

        let err = fetch_tab(&ctx, Some("Writers"))
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Configuration);
        assert!(source.urls().is_empty());
    }

    #[tokio::test]
    async fn fetch_tab_forwards_upstream_payload() {
        let payload = serde_json::json!({ "range": "Writers!A1:Z1000", "values": [["a"]] });
        let source = RecordingSource::ok(payload.clone());
        let ctx = context(ProxyConfig::default(), source.clone());

        let value = fetch_tab(&ctx, None).await.expect("payload");
        assert_eq!(value, payload);
        assert_eq!(
            source.urls(),
            vec![
                "https://sheets.example.test/v4/spreadsheets/sheet-123/values/Writers!A1:Z1000?key=key-abc"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_reported_with_message() {
        let source = RecordingSource::failing("Google Sheets API error: 403 Forbidden");
        let ctx = context(ProxyConfig::default(), source);

        let err = fetch_tab(&ctx, Some("Writers"))
            .await
            .expect_err("should fail");
        assert_eq!(err.code, ErrorCode::Upstream);
        assert_eq!(err.message, "Google Sheets API error: 403 Forbidden");
    }
}
