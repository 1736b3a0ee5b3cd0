//! Widget state.
//!
//! DESIGN
//! ======
//! The only persistent state is what the button currently shows and
//! whether a click is being processed. Like status itself is never cached.

pub mod like;
