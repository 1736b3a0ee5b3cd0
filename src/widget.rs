//! The like/unlike toggle widget.
//!
//! A widget owns one control and one transport. `start` renders the state
//! the server reports; each click re-reads the server state, writes the
//! opposite, and renders only once the write is accepted.
//!
//! CONCURRENCY
//! ===========
//! All methods take `&self` and run on one cooperative thread. Under
//! [`ClickPolicy::Exclusive`] a [`ClickGate`] admits one click at a time and
//! the control is marked busy meanwhile. Under [`ClickPolicy::Unguarded`]
//! overlapping clicks interleave at their network awaits and whichever
//! renders last decides what the button shows.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::{ButtonStyle, ButtonTheme, ClickPolicy, WidgetConfig};
use crate::control::LikeControl;
use crate::net::LikeApi;
use crate::net::types::{CafeId, LikeAction, LikeError, WriteReceipt};
use crate::observe::{LogObserver, Observer, WidgetEvent};
use crate::state::like::{ButtonState, ClickGate, ClickTicket};

/// What a click ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The write was accepted and the button now shows this state.
    Toggled(ButtonState),
    /// Another click was still in flight.
    Ignored,
}

pub struct LikeToggleWidget<C, A> {
    control: C,
    api: A,
    theme: ButtonTheme,
    policy: ClickPolicy,
    observer: Rc<dyn Observer>,
    gate: ClickGate,
    rendered: Cell<Option<ButtonState>>,
}

impl<C: LikeControl, A: LikeApi> LikeToggleWidget<C, A> {
    pub fn new(control: C, api: A) -> Self {
        Self {
            control,
            api,
            theme: ButtonTheme::default(),
            policy: ClickPolicy::default(),
            observer: Rc::new(LogObserver),
            gate: ClickGate::default(),
            rendered: Cell::new(None),
        }
    }

    /// Build with the theme and click policy from `config`.
    pub fn from_config(control: C, api: A, config: &WidgetConfig) -> Self {
        Self::new(control, api)
            .with_theme(config.theme.clone())
            .with_policy(config.policy)
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ButtonTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ClickPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Rc::new(observer);
        self
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Last state rendered, `None` before the first render.
    pub fn rendered_state(&self) -> Option<ButtonState> {
        self.rendered.get()
    }

    /// Read the item identifier from the control.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::MissingIdentifier`] or [`LikeError::InvalidIdentifier`].
    pub fn cafe_id(&self) -> Result<CafeId, LikeError> {
        CafeId::from_attribute(self.control.item_id().as_deref())
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Render whatever the server currently reports for the bound item.
    ///
    /// On failure the control is left as the markup had it.
    ///
    /// # Errors
    ///
    /// Returns identifier, network or protocol errors from the status query.
    pub async fn start(&self) -> Result<ButtonState, LikeError> {
        let result = self.start_inner().await;
        self.report("start", result)
    }

    async fn start_inner(&self) -> Result<ButtonState, LikeError> {
        let cafe_id = self.cafe_id()?;
        let state = ButtonState::from_liked(self.is_liked(cafe_id).await?);
        self.render(state);
        Ok(state)
    }

    /// Ask the server whether `cafe_id` is liked.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::Network`] or [`LikeError::Protocol`].
    pub async fn is_liked(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        let liked = self.api.check_like(cafe_id).await?;
        self.emit(&WidgetEvent::StatusChecked { cafe_id, liked });
        Ok(liked)
    }

    /// Click handler: re-check the server, write the opposite, render.
    ///
    /// # Errors
    ///
    /// Returns the first identifier, transport or rejected-write error; the
    /// rendered state is unchanged in that case.
    pub async fn handle_like_click(&self) -> Result<ClickOutcome, LikeError> {
        let _busy = match self.policy {
            ClickPolicy::Exclusive => {
                let Some(ticket) = self.gate.try_enter() else {
                    self.emit(&WidgetEvent::ClickIgnored);
                    return Ok(ClickOutcome::Ignored);
                };
                Some(BusyControl::enter(&self.control, ticket))
            }
            ClickPolicy::Unguarded => None,
        };

        let result = self.toggle().await;
        self.report("click", result.map(ClickOutcome::Toggled))
    }

    async fn toggle(&self) -> Result<ButtonState, LikeError> {
        let cafe_id = self.cafe_id()?;
        let current = ButtonState::from_liked(self.is_liked(cafe_id).await?);
        let receipt = if current.is_liked() {
            self.unlike_cafe(cafe_id).await?
        } else {
            self.like_cafe(cafe_id).await?
        };

        let next = current.toggled();
        log::debug!("cafe {cafe_id}: write answered {}, rendering {next:?}", receipt.status);
        match next {
            ButtonState::Liked => self.change_button_to_liked(),
            ButtonState::Unliked => self.change_button_to_unliked(),
        }
        Ok(next)
    }

    /// Add `cafe_id` to the user's likes.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::Network`], or [`LikeError::Rejected`] for a non-2xx status.
    pub async fn like_cafe(&self, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        self.write(LikeAction::Like, cafe_id).await
    }

    /// Remove `cafe_id` from the user's likes.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::Network`], or [`LikeError::Rejected`] for a non-2xx status.
    pub async fn unlike_cafe(&self, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        self.write(LikeAction::Unlike, cafe_id).await
    }

    async fn write(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        let receipt = self
            .api
            .submit(action, cafe_id)
            .await?
            .into_result(action)?;
        self.emit(&WidgetEvent::WriteAccepted { action, cafe_id, status: receipt.status });
        Ok(receipt)
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    pub fn change_button_to_liked(&self) {
        self.render(ButtonState::Liked);
    }

    pub fn change_button_to_unliked(&self) {
        self.render(ButtonState::Unliked);
    }

    fn render(&self, state: ButtonState) {
        let (show, hide): (&ButtonStyle, &ButtonStyle) = match state {
            ButtonState::Liked => (&self.theme.liked, &self.theme.unliked),
            ButtonState::Unliked => (&self.theme.unliked, &self.theme.liked),
        };
        self.control.set_label(&show.label);
        self.control.remove_class(&hide.class);
        self.control.add_class(&show.class);
        self.rendered.set(Some(state));
        self.emit(&WidgetEvent::Rendered { state });
    }

    fn emit(&self, event: &WidgetEvent) {
        self.observer.observe(event);
    }

    fn report<T>(&self, operation: &'static str, result: Result<T, LikeError>) -> Result<T, LikeError> {
        if let Err(err) = &result {
            self.emit(&WidgetEvent::failed(operation, err));
        }
        result
    }
}

/// Keeps the control busy for as long as the click ticket is held.
struct BusyControl<'a, C: LikeControl> {
    control: &'a C,
    _ticket: ClickTicket<'a>,
}

impl<'a, C: LikeControl> BusyControl<'a, C> {
    fn enter(control: &'a C, ticket: ClickTicket<'a>) -> Self {
        control.set_busy(true);
        Self { control, _ticket: ticket }
    }
}

impl<C: LikeControl> Drop for BusyControl<'_, C> {
    fn drop(&mut self) {
        self.control.set_busy(false);
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
