//! Session and route gating
//!
//! The session store owns the credential and the authenticated flag; the
//! guard turns that state into per-route verdicts and the guarded navigator
//! applies them.

pub mod guard;
pub mod navigator;
pub mod store;

pub use guard::{decide, RouteGroup, Verdict};
pub use navigator::{GuardedNavigator, Navigator};
pub use store::{SessionState, SessionStatus, SessionStore};
