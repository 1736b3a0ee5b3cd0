//! The page element a widget drives.
//!
//! Controls are mutated through `&self`, the way DOM handles are: the
//! widget shares one control between the start task and every click task.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

/// Operations the widget needs from its button.
pub trait LikeControl {
    /// Raw value of the identifier attribute, read fresh on every call.
    fn item_id(&self) -> Option<String>;

    fn set_label(&self, label: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    /// Mark the control as unavailable while a click is in flight.
    fn set_busy(&self, busy: bool);
}

/// Headless control backed by plain fields.
///
/// Used by the CLI and by tests; mirrors what the DOM binding does to a
/// real button.
#[derive(Debug, Default)]
pub struct MemoryControl {
    item_id: RefCell<Option<String>>,
    label: RefCell<String>,
    classes: RefCell<BTreeSet<String>>,
    busy: Cell<bool>,
}

impl MemoryControl {
    #[must_use]
    pub fn new(item_id: impl Into<String>) -> Self {
        Self { item_id: RefCell::new(Some(item_id.into())), ..Self::default() }
    }

    /// Start from existing markup classes, e.g. the server-rendered default.
    #[must_use]
    pub fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> Self {
        self.classes
            .borrow_mut()
            .extend(classes.into_iter().map(str::to_owned));
        self
    }

    pub fn set_item_id(&self, item_id: Option<&str>) {
        *self.item_id.borrow_mut() = item_id.map(str::to_owned);
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

impl LikeControl for MemoryControl {
    fn item_id(&self) -> Option<String> {
        self.item_id.borrow().clone()
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_owned();
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_owned());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }
}

impl<C: LikeControl + ?Sized> LikeControl for std::rc::Rc<C> {
    fn item_id(&self) -> Option<String> {
        (**self).item_id()
    }

    fn set_label(&self, label: &str) {
        (**self).set_label(label);
    }

    fn add_class(&self, class: &str) {
        (**self).add_class(class);
    }

    fn remove_class(&self, class: &str) {
        (**self).remove_class(class);
    }

    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy);
    }
}
