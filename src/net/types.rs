//! Wire types and errors for the likes service.
//!
//! The status endpoint answers with a JSON object whose `likes` field is the
//! like status; only a literal boolean `true` counts as liked. Writes carry
//! the item identifier as a JSON number.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced while reading the control or talking to the likes service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LikeError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// No element on the page matched the widget selector.
    #[error("no control matches selector `{selector}`")]
    MissingControl { selector: String },

    /// The control does not carry an item identifier attribute.
    #[error("control has no item identifier")]
    MissingIdentifier,

    /// The identifier attribute is not an integer.
    #[error("invalid item identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Network(String),

    /// The status response body was not the expected JSON object.
    #[error("malformed response: {0}")]
    Protocol(String),

    /// A like/unlike write came back with a non-success status.
    #[error("{action} rejected: status {status}")]
    Rejected { action: LikeAction, status: u16 },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LikeError {
    /// Stable machine-readable code for diagnostics.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingControl { .. } => "E_MISSING_CONTROL",
            Self::MissingIdentifier => "E_MISSING_IDENTIFIER",
            Self::InvalidIdentifier(_) => "E_INVALID_IDENTIFIER",
            Self::Network(_) => "E_NETWORK",
            Self::Protocol(_) => "E_PROTOCOL",
            Self::Rejected { .. } => "E_REJECTED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT",
        }
    }
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a likeable item, as read from the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CafeId(i64);

impl CafeId {
    #[must_use]
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }

    /// Parse the raw identifier attribute of a control.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::MissingIdentifier`] when the attribute is absent
    /// or blank, and [`LikeError::InvalidIdentifier`] when it is not an integer.
    pub fn from_attribute(raw: Option<&str>) -> Result<Self, LikeError> {
        match raw.map(str::trim) {
            None | Some("") => Err(LikeError::MissingIdentifier),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for CafeId {
    type Err = LikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| LikeError::InvalidIdentifier(s.to_owned()))
    }
}

impl fmt::Display for CafeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ACTIONS AND BODIES
// =============================================================================

/// The two mutating calls the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl fmt::Display for LikeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => f.write_str("like"),
            Self::Unlike => f.write_str("unlike"),
        }
    }
}

/// JSON body for both write endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeRequest {
    pub cafe_id: CafeId,
}

/// Outcome of a write call that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct WriteReceipt {
    pub status: u16,
}

impl WriteReceipt {
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx receipt into [`LikeError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::Rejected`] when the status is outside 2xx.
    pub fn into_result(self, action: LikeAction) -> Result<Self, LikeError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(LikeError::Rejected { action, status: self.status })
        }
    }
}

// =============================================================================
// STATUS PARSING
// =============================================================================

/// Decide the like status from the raw status-endpoint body.
///
/// # Errors
///
/// Returns [`LikeError::Protocol`] if the body is not JSON or not an object.
pub fn parse_likes_body(text: &str) -> Result<bool, LikeError> {
    let value: Value = serde_json::from_str(text).map_err(|e| LikeError::Protocol(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(LikeError::Protocol("expected a JSON object".to_owned()));
    };
    Ok(matches!(map.get("likes"), Some(Value::Bool(true))))
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
