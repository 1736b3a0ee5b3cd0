use std::cell::Cell;

/// The two states a like button can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Liked,
    Unliked,
}

impl ButtonState {
    #[must_use]
    pub fn from_liked(liked: bool) -> Self {
        if liked { Self::Liked } else { Self::Unliked }
    }

    #[must_use]
    pub fn is_liked(self) -> bool {
        self == Self::Liked
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Liked => Self::Unliked,
            Self::Unliked => Self::Liked,
        }
    }
}

/// Admits one click at a time.
#[derive(Debug, Default)]
pub struct ClickGate {
    in_flight: Cell<bool>,
}

impl ClickGate {
    /// Claim the gate. Returns `None` if a click is already running.
    pub fn try_enter(&self) -> Option<ClickTicket<'_>> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(ClickTicket { gate: self })
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }
}

/// Holds the gate until dropped, on every exit path.
#[derive(Debug)]
pub struct ClickTicket<'a> {
    gate: &'a ClickGate,
}

impl Drop for ClickTicket<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.set(false);
    }
}

#[cfg(test)]
#[path = "like_test.rs"]
mod like_test;
