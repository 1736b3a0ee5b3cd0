//! Transport layer for the likes service.
//!
//! DESIGN
//! ======
//! The widget only sees [`LikeApi`]. Native builds plug in
//! [`http::HttpLikeApi`] (`reqwest`), the browser plugs in
//! [`browser::BrowserLikeApi`] (`gloo-net`), and tests plug in scripted fakes.
//! Futures are `?Send`: everything runs on one cooperative thread.

#[cfg(feature = "hydrate")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod types;

use std::rc::Rc;

use types::{CafeId, LikeAction, LikeError, WriteReceipt};

/// The three calls the widget makes against the likes service.
#[async_trait::async_trait(?Send)]
pub trait LikeApi {
    /// `GET /api/likes?cafe_id=<id>`; true iff the body's `likes` is `true`.
    async fn check_like(&self, cafe_id: CafeId) -> Result<bool, LikeError>;

    /// `POST /api/like` or `/api/unlike` with `{"cafe_id": <id>}`.
    ///
    /// Returns the receipt whatever the status code; the caller decides
    /// what a non-2xx means.
    async fn submit(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError>;
}

#[async_trait::async_trait(?Send)]
impl<A: LikeApi + ?Sized> LikeApi for Rc<A> {
    async fn check_like(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        (**self).check_like(cafe_id).await
    }

    async fn submit(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        (**self).submit(action, cafe_id).await
    }
}
