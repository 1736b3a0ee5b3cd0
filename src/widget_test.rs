use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};

use tokio::sync::oneshot;

use super::*;
use crate::config::ButtonStyle;
use crate::control::MemoryControl;

// =============================================================
// Scripted likes service
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Check(i64),
    Submit(LikeAction, i64),
}

/// Where a gated write waits relative to the server applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Park {
    /// Server state already changed, response held back.
    AfterApply,
    /// Request held back before the server sees it.
    BeforeApply,
}

struct WriteGate {
    park: Park,
    parked: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

impl WriteGate {
    async fn hold(self) {
        if self.parked.send(()).is_ok() {
            drop(self.release.await);
        }
    }
}

#[derive(Default)]
struct FakeApi {
    liked: RefCell<BTreeSet<i64>>,
    calls: RefCell<Vec<Call>>,
    reject_status: Cell<Option<u16>>,
    accept_status: Cell<Option<u16>>,
    check_error: RefCell<Option<LikeError>>,
    write_error: RefCell<Option<LikeError>>,
    gates: RefCell<VecDeque<WriteGate>>,
}

impl FakeApi {
    fn with_liked(ids: &[i64]) -> Self {
        let api = Self::default();
        api.liked.borrow_mut().extend(ids);
        api
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn submits(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Submit(..)))
            .collect()
    }

    /// Park the next write; returns (parked, release).
    fn gate_next_write(&self, park: Park) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (parked_tx, parked_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates
            .borrow_mut()
            .push_back(WriteGate { park, parked: parked_tx, release: release_rx });
        (parked_rx, release_tx)
    }

    fn apply(&self, action: LikeAction, cafe_id: CafeId) {
        let mut liked = self.liked.borrow_mut();
        match action {
            LikeAction::Like => liked.insert(cafe_id.get()),
            LikeAction::Unlike => liked.remove(&cafe_id.get()),
        };
    }
}

#[async_trait::async_trait(?Send)]
impl LikeApi for FakeApi {
    async fn check_like(&self, cafe_id: CafeId) -> Result<bool, LikeError> {
        self.calls.borrow_mut().push(Call::Check(cafe_id.get()));
        if let Some(err) = self.check_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.liked.borrow().contains(&cafe_id.get()))
    }

    async fn submit(&self, action: LikeAction, cafe_id: CafeId) -> Result<WriteReceipt, LikeError> {
        self.calls.borrow_mut().push(Call::Submit(action, cafe_id.get()));
        if let Some(err) = self.write_error.borrow().clone() {
            return Err(err);
        }
        if let Some(status) = self.reject_status.get() {
            return Ok(WriteReceipt { status });
        }
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(gate) if gate.park == Park::BeforeApply => {
                gate.hold().await;
                self.apply(action, cafe_id);
            }
            Some(gate) => {
                self.apply(action, cafe_id);
                gate.hold().await;
            }
            None => self.apply(action, cafe_id),
        }
        Ok(WriteReceipt { status: self.accept_status.get().unwrap_or(200) })
    }
}

/// Memory control that also counts busy flag changes.
#[derive(Default)]
struct CountingControl {
    inner: MemoryControl,
    busy_changes: Cell<usize>,
}

impl From<MemoryControl> for CountingControl {
    fn from(inner: MemoryControl) -> Self {
        Self { inner, busy_changes: Cell::new(0) }
    }
}

impl std::ops::Deref for CountingControl {
    type Target = MemoryControl;

    fn deref(&self) -> &MemoryControl {
        &self.inner
    }
}

impl CountingControl {
    fn busy_changes(&self) -> usize {
        self.busy_changes.get()
    }
}

impl LikeControl for CountingControl {
    fn item_id(&self) -> Option<String> {
        self.inner.item_id()
    }

    fn set_label(&self, label: &str) {
        self.inner.set_label(label);
    }

    fn add_class(&self, class: &str) {
        self.inner.add_class(class);
    }

    fn remove_class(&self, class: &str) {
        self.inner.remove_class(class);
    }

    fn set_busy(&self, busy: bool) {
        self.busy_changes.set(self.busy_changes.get() + 1);
        self.inner.set_busy(busy);
    }
}

fn widget(id: &str, api: FakeApi) -> LikeToggleWidget<CountingControl, FakeApi> {
    LikeToggleWidget::new(CountingControl::from(MemoryControl::new(id)), api)
}

fn assert_shows_liked(control: &MemoryControl) {
    assert_eq!(control.label(), "Unlike");
    assert!(control.has_class("btn-primary"));
    assert!(!control.has_class("btn-outline-primary"));
}

fn assert_shows_unliked(control: &MemoryControl) {
    assert_eq!(control.label(), "Like");
    assert!(control.has_class("btn-outline-primary"));
    assert!(!control.has_class("btn-primary"));
}

// =============================================================
// start
// =============================================================

#[tokio::test]
async fn start_not_liked_renders_unliked_without_writes() {
    let w = widget("7", FakeApi::default());

    assert_eq!(w.start().await, Ok(ButtonState::Unliked));
    assert_shows_unliked(w.control());
    assert_eq!(w.api.calls(), vec![Call::Check(7)]);
    assert_eq!(w.rendered_state(), Some(ButtonState::Unliked));
}

#[tokio::test]
async fn start_liked_renders_liked() {
    let w = widget("42", FakeApi::with_liked(&[42]));

    assert_eq!(w.start().await, Ok(ButtonState::Liked));
    assert_shows_liked(w.control());
}

#[tokio::test]
async fn start_failure_leaves_markup_untouched() {
    let api = FakeApi::default();
    *api.check_error.borrow_mut() = Some(LikeError::Network("offline".to_owned()));
    let control = MemoryControl::new("7").with_classes(["btn", "like-button"]);
    let w = LikeToggleWidget::new(CountingControl::from(control), api);

    let err = w.start().await.unwrap_err();
    assert_eq!(err.error_code(), "E_NETWORK");
    assert_eq!(w.control().label(), "");
    assert_eq!(w.control().classes(), vec!["btn".to_owned(), "like-button".to_owned()]);
    assert_eq!(w.rendered_state(), None);
}

#[tokio::test]
async fn start_without_identifier_makes_no_calls() {
    let w = LikeToggleWidget::new(CountingControl::default(), FakeApi::default());

    assert_eq!(w.start().await, Err(LikeError::MissingIdentifier));
    assert!(w.api.calls().is_empty());
}

// =============================================================
// handle_like_click
// =============================================================

#[tokio::test]
async fn click_when_liked_unlikes() {
    let w = widget("42", FakeApi::with_liked(&[42]));
    w.start().await.unwrap();

    let outcome = w.handle_like_click().await.unwrap();

    assert_eq!(outcome, ClickOutcome::Toggled(ButtonState::Unliked));
    assert_eq!(
        w.api.calls(),
        vec![Call::Check(42), Call::Check(42), Call::Submit(LikeAction::Unlike, 42)]
    );
    assert_shows_unliked(w.control());
    assert!(!w.api.liked.borrow().contains(&42));
}

#[tokio::test]
async fn click_when_not_liked_likes() {
    let w = widget("7", FakeApi::default());

    let outcome = w.handle_like_click().await.unwrap();

    assert_eq!(outcome, ClickOutcome::Toggled(ButtonState::Liked));
    assert_eq!(w.api.calls(), vec![Call::Check(7), Call::Submit(LikeAction::Like, 7)]);
    assert_shows_liked(w.control());
}

#[tokio::test]
async fn click_trusts_server_over_rendered_state() {
    let w = widget("9", FakeApi::default());
    w.start().await.unwrap();
    assert_shows_unliked(w.control());

    // Liked from another tab since the page loaded.
    w.api.liked.borrow_mut().insert(9);

    w.handle_like_click().await.unwrap();
    assert_eq!(w.api.submits(), vec![Call::Submit(LikeAction::Unlike, 9)]);
    assert_shows_unliked(w.control());
}

#[tokio::test]
async fn rejected_write_keeps_rendered_state() {
    let w = widget("7", FakeApi::default());
    w.start().await.unwrap();
    w.api.reject_status.set(Some(401));

    let err = w.handle_like_click().await.unwrap_err();

    assert_eq!(err, LikeError::Rejected { action: LikeAction::Like, status: 401 });
    assert_shows_unliked(w.control());
    assert_eq!(w.rendered_state(), Some(ButtonState::Unliked));
    assert!(!w.control().is_busy());
}

#[tokio::test]
async fn failed_write_keeps_rendered_state() {
    let w = widget("42", FakeApi::with_liked(&[42]));
    w.start().await.unwrap();
    *w.api.write_error.borrow_mut() = Some(LikeError::Network("reset".to_owned()));

    assert!(matches!(w.handle_like_click().await, Err(LikeError::Network(_))));
    assert_shows_liked(w.control());
}

#[tokio::test]
async fn click_with_invalid_identifier_makes_no_calls() {
    let w = widget("espresso", FakeApi::default());

    let err = w.handle_like_click().await.unwrap_err();
    assert_eq!(err, LikeError::InvalidIdentifier("espresso".to_owned()));
    assert!(w.api.calls().is_empty());
    assert!(!w.control().is_busy());
}

#[tokio::test]
async fn identifier_is_read_on_every_click() {
    let w = widget("1", FakeApi::default());
    w.handle_like_click().await.unwrap();

    w.control().set_item_id(Some("2"));
    w.handle_like_click().await.unwrap();

    assert_eq!(
        w.api.submits(),
        vec![Call::Submit(LikeAction::Like, 1), Call::Submit(LikeAction::Like, 2)]
    );
}

// =============================================================
// Overlapping clicks
// =============================================================

#[tokio::test]
async fn exclusive_policy_ignores_click_in_flight() {
    let w = widget("7", FakeApi::default());
    let (parked, release) = w.api.gate_next_write(Park::AfterApply);

    let (first, second) = tokio::join!(w.handle_like_click(), async {
        parked.await.unwrap();
        assert!(w.control().is_busy());
        let second = w.handle_like_click().await;
        release.send(()).unwrap();
        second
    });

    assert_eq!(first, Ok(ClickOutcome::Toggled(ButtonState::Liked)));
    assert_eq!(second, Ok(ClickOutcome::Ignored));
    assert_eq!(w.api.calls(), vec![Call::Check(7), Call::Submit(LikeAction::Like, 7)]);
    assert!(!w.control().is_busy());
    assert_eq!(w.control().busy_changes(), 2);
    assert_shows_liked(w.control());
}

#[tokio::test]
async fn unguarded_policy_last_render_wins() {
    let w = widget("7", FakeApi::default()).with_policy(ClickPolicy::Unguarded);
    let (parked, release) = w.api.gate_next_write(Park::AfterApply);

    // The first like lands on the server but its response is held back; the
    // second click sees the item liked and unlikes it before the first
    // click gets to render.
    let (first, second) = tokio::join!(w.handle_like_click(), async {
        parked.await.unwrap();
        let second = w.handle_like_click().await;
        release.send(()).unwrap();
        second
    });

    assert_eq!(second, Ok(ClickOutcome::Toggled(ButtonState::Unliked)));
    assert_eq!(first, Ok(ClickOutcome::Toggled(ButtonState::Liked)));
    assert_eq!(
        w.api.submits(),
        vec![Call::Submit(LikeAction::Like, 7), Call::Submit(LikeAction::Unlike, 7)]
    );
    // Button says liked while the server says otherwise.
    assert_shows_liked(w.control());
    assert!(!w.api.liked.borrow().contains(&7));
    assert_eq!(w.control().busy_changes(), 0);
}

#[tokio::test]
async fn unguarded_policy_double_like_when_second_check_beats_first_write() {
    let w = widget("7", FakeApi::default()).with_policy(ClickPolicy::Unguarded);
    let (parked, release) = w.api.gate_next_write(Park::BeforeApply);

    // The first like is still on its way to the server when the second
    // click asks for the status, so both clicks see "not liked".
    let (first, second) = tokio::join!(w.handle_like_click(), async {
        parked.await.unwrap();
        let second = w.handle_like_click().await;
        release.send(()).unwrap();
        second
    });

    assert_eq!(first, Ok(ClickOutcome::Toggled(ButtonState::Liked)));
    assert_eq!(second, Ok(ClickOutcome::Toggled(ButtonState::Liked)));
    assert_eq!(
        w.api.submits(),
        vec![Call::Submit(LikeAction::Like, 7), Call::Submit(LikeAction::Like, 7)]
    );
    assert_shows_liked(w.control());
    assert!(w.api.liked.borrow().contains(&7));
}

#[tokio::test]
async fn click_accepts_any_2xx_write() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let w = widget("42", FakeApi::with_liked(&[42]))
        .with_observer(move |e: &WidgetEvent| sink.borrow_mut().push(e.clone()));
    w.api.accept_status.set(Some(204));

    let outcome = w.handle_like_click().await.unwrap();

    assert_eq!(outcome, ClickOutcome::Toggled(ButtonState::Unliked));
    assert_shows_unliked(w.control());
    assert!(events.borrow().contains(&WidgetEvent::WriteAccepted {
        action: LikeAction::Unlike,
        cafe_id: CafeId::new(42),
        status: 204,
    }));
}

#[tokio::test]
async fn repeated_like_writes_are_not_deduplicated() {
    let w = widget("5", FakeApi::default());
    let id = CafeId::new(5);

    w.like_cafe(id).await.unwrap();
    w.like_cafe(id).await.unwrap();

    assert_eq!(
        w.api.submits(),
        vec![Call::Submit(LikeAction::Like, 5), Call::Submit(LikeAction::Like, 5)]
    );
    assert_eq!(w.rendered_state(), None);
}

// =============================================================
// Theme and observer
// =============================================================

#[tokio::test]
async fn custom_theme_is_rendered() {
    let theme = ButtonTheme {
        liked: ButtonStyle { label: "Saved".to_owned(), class: "is-saved".to_owned() },
        unliked: ButtonStyle { label: "Save".to_owned(), class: "is-unsaved".to_owned() },
    };
    let w = widget("3", FakeApi::default()).with_theme(theme);

    w.start().await.unwrap();
    assert_eq!(w.control().label(), "Save");
    w.handle_like_click().await.unwrap();
    assert_eq!(w.control().label(), "Saved");
    assert!(w.control().has_class("is-saved"));
    assert!(!w.control().has_class("is-unsaved"));
}

#[tokio::test]
async fn observer_sees_click_sequence() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let w = widget("7", FakeApi::default()).with_observer(move |e: &WidgetEvent| sink.borrow_mut().push(e.clone()));

    w.handle_like_click().await.unwrap();

    let id = CafeId::new(7);
    assert_eq!(
        *events.borrow(),
        vec![
            WidgetEvent::StatusChecked { cafe_id: id, liked: false },
            WidgetEvent::WriteAccepted { action: LikeAction::Like, cafe_id: id, status: 200 },
            WidgetEvent::Rendered { state: ButtonState::Liked },
        ]
    );
}

#[tokio::test]
async fn observer_sees_failures_once() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let w = widget("7", FakeApi::default()).with_observer(move |e: &WidgetEvent| sink.borrow_mut().push(e.clone()));
    w.api.reject_status.set(Some(500));

    let _ = w.handle_like_click().await;

    let failures: Vec<_> = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, WidgetEvent::Failed { .. }))
        .cloned()
        .collect();
    assert_eq!(
        failures,
        vec![WidgetEvent::Failed {
            operation: "click",
            code: "E_REJECTED",
            message: "like rejected: status 500".to_owned(),
        }]
    );
}

#[tokio::test]
async fn from_config_applies_policy_and_theme() {
    let config = WidgetConfig { policy: ClickPolicy::Unguarded, ..WidgetConfig::default() };
    let w = LikeToggleWidget::from_config(CountingControl::from(MemoryControl::new("1")), FakeApi::default(), &config);

    w.handle_like_click().await.unwrap();
    assert_eq!(w.control().busy_changes(), 0);
    assert_shows_liked(w.control());
}
