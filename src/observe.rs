//! Diagnostics emitted by the widget.
//!
//! Every widget holds an [`Observer`]. The default [`LogObserver`] forwards
//! to the `log` facade (the browser console under `console_log`); tests and
//! embedders can inject their own to assert on or ship the events.

use crate::net::types::{CafeId, LikeAction, LikeError};
use crate::state::like::ButtonState;

/// Something the widget did or failed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    StatusChecked { cafe_id: CafeId, liked: bool },
    WriteAccepted { action: LikeAction, cafe_id: CafeId, status: u16 },
    Rendered { state: ButtonState },
    ClickIgnored,
    Failed { operation: &'static str, code: &'static str, message: String },
}

impl WidgetEvent {
    pub(crate) fn failed(operation: &'static str, err: &LikeError) -> Self {
        Self::Failed { operation, code: err.error_code(), message: err.to_string() }
    }
}

pub trait Observer {
    fn observe(&self, event: &WidgetEvent);
}

impl<F: Fn(&WidgetEvent)> Observer for F {
    fn observe(&self, event: &WidgetEvent) {
        self(event);
    }
}

/// Writes events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&self, event: &WidgetEvent) {
        match event {
            WidgetEvent::StatusChecked { cafe_id, liked } => {
                log::debug!("cafe {cafe_id} liked={liked}");
            }
            WidgetEvent::WriteAccepted { action, cafe_id, status } => {
                log::info!("{action} cafe {cafe_id}: status {status}");
            }
            WidgetEvent::Rendered { state } => log::debug!("like button rendered {state:?}"),
            WidgetEvent::ClickIgnored => log::debug!("like click ignored: previous click still in flight"),
            WidgetEvent::Failed { operation, code, message } => {
                log::warn!("like {operation} failed [{code}]: {message}");
            }
        }
    }
}
