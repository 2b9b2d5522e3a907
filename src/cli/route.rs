//! Route guard inspection
//!
//! Shows what the navigation guard decides for a screen given the stored
//! session, without navigating anywhere.

use serde::Serialize;

use super::AppContext;
use crate::display::{print_output, OutputFormat};
use crate::error::FinGridResult;
use crate::session::{decide, RouteGroup, Verdict};

#[derive(Serialize)]
struct RouteView {
    route: RouteGroup,
    path: &'static str,
    ready: bool,
    authenticated: bool,
    verdict: Verdict,
}

/// Print the guard's verdict for `path`
pub fn handle_route(ctx: &AppContext, path: &str, format: OutputFormat) -> FinGridResult<()> {
    let route = RouteGroup::from_path(path)?;
    let status = ctx.session.status();
    let view = RouteView {
        route,
        path: route.path(),
        ready: status.is_ready,
        authenticated: status.is_authenticated,
        verdict: decide(status.is_ready, status.is_authenticated, route),
    };

    print_output(&view, format, |v| {
        let session = match (v.ready, v.authenticated) {
            (false, _) => "not ready",
            (true, false) => "signed out",
            (true, true) => "signed in",
        };
        format!(
            "Route:   {}\nSession: {}\nVerdict: {}\n",
            v.path, session, v.verdict
        )
    })
}
