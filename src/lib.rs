//! # like-toggle
//!
//! Like/unlike toggle button that keeps its rendered state in step with a
//! remote likes service.
//!
//! The widget itself is transport- and DOM-agnostic: it talks to the page
//! through the [`control::LikeControl`] trait and to the backend through the
//! [`net::LikeApi`] trait. Browser bindings (`gloo-net` + `web-sys`) live
//! behind the `hydrate` feature; native builds get a `reqwest` transport.

pub mod config;
pub mod control;
pub mod net;
pub mod observe;
pub mod state;
pub mod util;
pub mod widget;

pub use config::{ApiConfig, ButtonTheme, ClickPolicy, WidgetConfig};
pub use control::{LikeControl, MemoryControl};
pub use net::LikeApi;
pub use net::types::{CafeId, LikeAction, LikeError, WriteReceipt};
pub use observe::{LogObserver, Observer, WidgetEvent};
pub use state::like::ButtonState;
pub use widget::{ClickOutcome, LikeToggleWidget};
