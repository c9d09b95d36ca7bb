//! The interactive writing session: idle markers, the lock gate, the editor
//! surface, and the [`Journal`] state that ties them together.

pub mod app;
pub mod editor;
pub mod lock;
pub mod timestamp;

pub use app::{Journal, SessionEvent};
pub use editor::{Edit, EditorSurface};
pub use lock::{ChangeOutcome, ChangeStep, LockGate, LockState, PasswordChange};
pub use timestamp::{IdleThreshold, TimestampInserter};
