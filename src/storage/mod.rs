//! In-memory storage for student records.
//!
//! [`StudentStore`] keeps students in a generational [`Arena`] and tracks
//! their order separately, so reordering never moves a student and a
//! [`StudentHandle`] survives sorting and updates.

pub mod arena;
pub mod store;

pub use arena::{Arena, Handle};
pub use store::StudentStore;

/// Stable reference to a student in a [`StudentStore`].
pub type StudentHandle = Handle;
