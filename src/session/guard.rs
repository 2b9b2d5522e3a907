//! Route gating
//!
//! [`decide`] is a pure function from the session flags and the route the
//! user is on to what the shell should do about it. Applying the verdict is
//! the navigator's job (see [`super::navigator`]).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FinGridError;

/// Screens of the app, grouped the way the guard cares about them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteGroup {
    Root,
    Login,
    Register,
    Home,
    Analytics,
    Budget,
    Profile,
    Explore,
    ConnectBank,
    Modal,
}

impl RouteGroup {
    pub const ALL: [RouteGroup; 10] = [
        Self::Root,
        Self::Login,
        Self::Register,
        Self::Home,
        Self::Analytics,
        Self::Budget,
        Self::Profile,
        Self::Explore,
        Self::ConnectBank,
        Self::Modal,
    ];

    /// Canonical path of the route
    pub fn path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "screens/login",
            Self::Register => "screens/register",
            Self::Home => "(tabs)",
            Self::Analytics => "(tabs)/analytics",
            Self::Budget => "(tabs)/budget",
            Self::Profile => "(tabs)/profile",
            Self::Explore => "(tabs)/explore",
            Self::ConnectBank => "screens/connect-bank",
            Self::Modal => "modal",
        }
    }

    /// Screens reachable without a session
    pub fn is_auth_screen(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Parse a route path; leading and trailing slashes are ignored
    pub fn from_path(path: &str) -> Result<Self, FinGridError> {
        let trimmed = path.trim().trim_matches('/');
        let route = match trimmed {
            "" | "index" => Self::Root,
            "screens/login" | "login" => Self::Login,
            "screens/register" | "register" => Self::Register,
            "(tabs)" | "(tabs)/index" | "home" => Self::Home,
            "(tabs)/analytics" | "analytics" => Self::Analytics,
            "(tabs)/budget" | "budget" => Self::Budget,
            "(tabs)/profile" | "profile" => Self::Profile,
            "(tabs)/explore" | "explore" => Self::Explore,
            "screens/connect-bank" | "connect-bank" => Self::ConnectBank,
            "modal" => Self::Modal,
            _ => {
                return Err(FinGridError::Validation(format!(
                    "Unknown route '{}'",
                    path
                )))
            }
        };
        Ok(route)
    }
}

impl FromStr for RouteGroup {
    type Err = FinGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// What the shell should do for the current route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "target", rename_all = "lowercase")]
pub enum Verdict {
    /// Session state unknown; render nothing and stay put
    Suspend,
    Allow,
    Redirect(RouteGroup),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suspend => write!(f, "suspend"),
            Self::Allow => write!(f, "allow"),
            Self::Redirect(target) => write!(f, "redirect to {}", target),
        }
    }
}

pub fn decide(is_ready: bool, is_authenticated: bool, route: RouteGroup) -> Verdict {
    if !is_ready {
        return Verdict::Suspend;
    }
    if !is_authenticated && !route.is_auth_screen() {
        return Verdict::Redirect(RouteGroup::Login);
    }
    if is_authenticated && (route.is_auth_screen() || route == RouteGroup::Root) {
        return Verdict::Redirect(RouteGroup::Home);
    }
    Verdict::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_suspends_everywhere() {
        for route in RouteGroup::ALL {
            assert_eq!(decide(false, false, route), Verdict::Suspend);
            assert_eq!(decide(false, true, route), Verdict::Suspend);
        }
    }

    #[test]
    fn test_signed_out_goes_to_login() {
        assert_eq!(
            decide(true, false, RouteGroup::Home),
            Verdict::Redirect(RouteGroup::Login)
        );
        assert_eq!(
            decide(true, false, RouteGroup::Root),
            Verdict::Redirect(RouteGroup::Login)
        );
        assert_eq!(decide(true, false, RouteGroup::Register), Verdict::Allow);
    }

    #[test]
    fn test_signed_in_leaves_auth_screens() {
        assert_eq!(
            decide(true, true, RouteGroup::Login),
            Verdict::Redirect(RouteGroup::Home)
        );
        assert_eq!(
            decide(true, true, RouteGroup::Root),
            Verdict::Redirect(RouteGroup::Home)
        );
        assert_eq!(decide(true, true, RouteGroup::ConnectBank), Verdict::Allow);
        assert_eq!(decide(true, true, RouteGroup::Analytics), Verdict::Allow);
    }

    #[test]
    fn test_redirect_target_is_allowed() {
        for authenticated in [false, true] {
            for route in RouteGroup::ALL {
                if let Verdict::Redirect(target) = decide(true, authenticated, route) {
                    assert_eq!(decide(true, authenticated, target), Verdict::Allow);
                }
            }
        }
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(RouteGroup::from_path("/").unwrap(), RouteGroup::Root);
        assert_eq!(RouteGroup::from_path("").unwrap(), RouteGroup::Root);
        assert_eq!(
            RouteGroup::from_path("/screens/login").unwrap(),
            RouteGroup::Login
        );
        assert_eq!(
            "(tabs)/analytics".parse::<RouteGroup>().unwrap(),
            RouteGroup::Analytics
        );
        assert_eq!(
            RouteGroup::from_path("screens/connect-bank/").unwrap(),
            RouteGroup::ConnectBank
        );
        assert!(RouteGroup::from_path("screens/nowhere").is_err());
    }

    #[test]
    fn test_canonical_paths_parse_back() {
        for route in RouteGroup::ALL {
            assert_eq!(RouteGroup::from_path(route.path()).unwrap(), route);
        }
    }
}
