//! Widget and transport configuration.
//!
//! Browser builds use [`WidgetConfig::default`], which targets the same
//! origin with relative paths. Native builds need an absolute base URL and
//! usually come through [`ApiConfig::from_env`].

use crate::net::types::{CafeId, LikeAction, LikeError};

pub const DEFAULT_CHECK_PATH: &str = "/api/likes";
pub const DEFAULT_ADD_PATH: &str = "/api/like";
pub const DEFAULT_REMOVE_PATH: &str = "/api/unlike";
pub const DEFAULT_NATIVE_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SELECTOR: &str = ".like-button";
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Location of the three likes endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for every path; empty means same-origin relative URLs.
    pub base_url: String,
    pub check_path: String,
    pub add_path: String,
    pub remove_path: String,
    pub timeouts: ApiTimeouts,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            check_path: DEFAULT_CHECK_PATH.to_owned(),
            add_path: DEFAULT_ADD_PATH.to_owned(),
            remove_path: DEFAULT_REMOVE_PATH.to_owned(),
            timeouts: ApiTimeouts::default(),
        }
    }
}

impl ApiConfig {
    /// Same defaults, rooted at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self { base_url: normalize_base_url(base_url), ..Self::default() }
    }

    /// Build typed API config from environment variables.
    ///
    /// Optional:
    /// - `LIKES_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `LIKES_CHECK_PATH`: default `/api/likes`
    /// - `LIKES_ADD_PATH`: default `/api/like`
    /// - `LIKES_REMOVE_PATH`: default `/api/unlike`
    /// - `LIKES_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LIKES_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::ConfigParse`] if a path does not start with `/`
    /// or a timeout is not a positive integer.
    pub fn from_env() -> Result<Self, LikeError> {
        let base_url = std::env::var("LIKES_BASE_URL").unwrap_or_else(|_| DEFAULT_NATIVE_BASE_URL.to_owned());
        let check_path = env_path("LIKES_CHECK_PATH", DEFAULT_CHECK_PATH)?;
        let add_path = env_path("LIKES_ADD_PATH", DEFAULT_ADD_PATH)?;
        let remove_path = env_path("LIKES_REMOVE_PATH", DEFAULT_REMOVE_PATH)?;
        let timeouts = ApiTimeouts {
            request_secs: env_parse_secs("LIKES_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_secs("LIKES_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { base_url: normalize_base_url(&base_url), check_path, add_path, remove_path, timeouts })
    }

    /// URL of the status endpoint, without the query string.
    #[must_use]
    pub fn check_url(&self) -> String {
        format!("{}{}", self.base_url, self.check_path)
    }

    /// URL of the write endpoint for `action`.
    #[must_use]
    pub fn action_url(&self, action: LikeAction) -> String {
        let path = match action {
            LikeAction::Like => &self.add_path,
            LikeAction::Unlike => &self.remove_path,
        };
        format!("{}{}", self.base_url, path)
    }

    /// Query pairs for the status endpoint.
    #[must_use]
    pub fn check_query(cafe_id: CafeId) -> [(&'static str, String); 1] {
        [("cafe_id", cafe_id.to_string())]
    }
}

/// Label and class for one rendered state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonStyle {
    pub label: String,
    pub class: String,
}

/// Presentation of the two button states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTheme {
    pub liked: ButtonStyle,
    pub unliked: ButtonStyle,
}

impl Default for ButtonTheme {
    fn default() -> Self {
        Self {
            liked: ButtonStyle { label: "Unlike".to_owned(), class: "btn-primary".to_owned() },
            unliked: ButtonStyle { label: "Like".to_owned(), class: "btn-outline-primary".to_owned() },
        }
    }
}

/// How the click handler treats a click that arrives while another is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClickPolicy {
    /// Ignore clicks while one is in flight and mark the control busy.
    #[default]
    Exclusive,
    /// Let overlapping clicks interleave; the last render wins.
    Unguarded,
}

/// Everything needed to mount a widget on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub api: ApiConfig,
    pub theme: ButtonTheme,
    pub policy: ClickPolicy,
    /// CSS selector used to find controls.
    pub selector: String,
    /// Attribute holding the item identifier.
    pub id_attribute: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            theme: ButtonTheme::default(),
            policy: ClickPolicy::default(),
            selector: DEFAULT_SELECTOR.to_owned(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_owned(),
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_path(key: &str, default: &str) -> Result<String, LikeError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default.to_owned());
    };
    let path = raw.trim();
    if path.starts_with('/') {
        Ok(path.to_owned())
    } else {
        Err(LikeError::ConfigParse(format!("{key} must start with '/': {raw}")))
    }
}

fn env_parse_secs(key: &str, default: u64) -> Result<u64, LikeError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(LikeError::ConfigParse(format!("{key} must be a positive integer: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
