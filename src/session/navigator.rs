//! Applying guard verdicts
//!
//! [`GuardedNavigator`] tracks the route the user is on, runs [`decide`] for
//! every change of route or session, and issues a `replace` only when the
//! verdict actually moves the user somewhere new.

use tokio::sync::watch;
use tracing::debug;

use super::guard::{decide, RouteGroup, Verdict};
use super::store::SessionStatus;

/// The shell's router
pub trait Navigator {
    /// Replace the current route without leaving history behind
    fn replace(&mut self, route: RouteGroup);
}

pub struct GuardedNavigator<N: Navigator> {
    navigator: N,
    current: RouteGroup,
    status: SessionStatus,
    last_redirect: Option<RouteGroup>,
}

impl<N: Navigator> GuardedNavigator<N> {
    pub fn new(navigator: N, initial: RouteGroup) -> Self {
        Self {
            navigator,
            current: initial,
            status: SessionStatus::default(),
            last_redirect: None,
        }
    }

    pub fn current(&self) -> RouteGroup {
        self.current
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// The user moved to `route` on their own
    pub fn navigate(&mut self, route: RouteGroup) -> Verdict {
        self.current = route;
        self.last_redirect = None;
        self.evaluate()
    }

    /// The session changed
    pub fn update_session(&mut self, status: SessionStatus) -> Verdict {
        self.status = status;
        self.evaluate()
    }

    /// Decide for the current inputs and apply the verdict
    pub fn evaluate(&mut self) -> Verdict {
        let verdict = decide(
            self.status.is_ready,
            self.status.is_authenticated,
            self.current,
        );
        self.apply(verdict);
        verdict
    }

    /// Apply a verdict; the same pending redirect is never issued twice
    pub fn apply(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Redirect(target) => {
                if self.last_redirect == Some(target) {
                    return;
                }
                debug!(from = %self.current, to = %target, "guard redirect");
                self.navigator.replace(target);
                self.last_redirect = Some(target);
                self.current = target;
            }
            Verdict::Allow => self.last_redirect = None,
            Verdict::Suspend => {}
        }
    }

    /// Re-evaluate on every session change until the session store goes away
    pub async fn follow(&mut self, mut session: watch::Receiver<SessionStatus>) {
        let status = *session.borrow_and_update();
        self.update_session(status);

        while session.changed().await.is_ok() {
            let status = *session.borrow_and_update();
            self.update_session(status);
        }
    }
}
