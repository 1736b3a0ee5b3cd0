//! Browser likes client over `gloo-net` (`fetch`).
//!
//! Requests go out with the page's cookies, so the backend sees the same
//! session the page was rendered for.

use gloo_net::http::Request;

use super::LikeApi;
use super::types::{CafeId, LikeAction, LikeError, LikeRequest, WriteReceipt, parse_likes_body};
use crate::config::ApiConfig;

pub struct BrowserLikeApi {
    config: ApiConfig,
}

impl BrowserLikeApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait(?Send)]
impl LikeApi for BrowserLikeApi {
    async fn check_like(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        let url = self.config.check_url();
        let resp = Request::get(&url)
            .query(ApiConfig::check_query(cafe_id))
            .send()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;
        let text = resp
            .text()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;
        parse_likes_body(&text)
    }

    async fn submit(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        let url = self.config.action_url(action);
        let resp = Request::post(&url)
            .json(&LikeRequest { cafe_id })
            .map_err(|e| LikeError::Protocol(e.to_string()))?
            .send()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;
        Ok(WriteReceipt { status: resp.status() })
    }
}
