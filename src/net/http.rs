//! Native likes client over `reqwest`.

use std::time::Duration;

use super::LikeApi;
use super::types::{CafeId, LikeAction, LikeError, LikeRequest, WriteReceipt, parse_likes_body};
use crate::config::ApiConfig;

pub struct HttpLikeApi {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpLikeApi {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: ApiConfig) -> Result<Self, LikeError> {
        Self::with_default_headers(config, reqwest::header::HeaderMap::new())
    }

    /// Like [`HttpLikeApi::new`], attaching `headers` to every request
    /// (session cookies for an authenticated backend, for instance).
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn with_default_headers(config: ApiConfig, headers: reqwest::header::HeaderMap) -> Result<Self, LikeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| LikeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait::async_trait(?Send)]
impl LikeApi for HttpLikeApi {
    async fn check_like(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        let response = self
            .http
            .get(self.config.check_url())
            .query(&ApiConfig::check_query(cafe_id))
            .send()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;
        log::debug!("like status for cafe {cafe_id}: http {status}");
        parse_likes_body(&text)
    }

    async fn submit(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        let response = self
            .http
            .post(self.config.action_url(action))
            .json(&LikeRequest { cafe_id })
            .send()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;

        Ok(WriteReceipt { status: response.status().as_u16() })
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
