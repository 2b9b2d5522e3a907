//! Session CLI commands
//!
//! Sign in, sign up, sign out and show who is signed in.

use serde::Serialize;

use super::{secret_or_prompt, AppContext};
use crate::display::{print_output, OutputFormat};
use crate::crypto::SecureString;
use crate::error::FinGridResult;
use crate::services::{AuthService, RegisterOutcome};
use crate::session::RouteGroup;

/// Sign in with email and password
pub async fn handle_login(
    ctx: &AppContext,
    email: &str,
    password: Option<String>,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Login)?;
    let password = secret_or_prompt(password, "Password: ")?;

    AuthService::new(ctx.api(), &ctx.session)
        .with_audit(&ctx.audit)
        .login(email, &password)
        .await?;

    println!("Signed in as {}", email.trim());
    Ok(())
}

/// Create an account, signing in when the backend allows it
pub async fn handle_register(
    ctx: &AppContext,
    email: &str,
    password: Option<String>,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Register)?;
    let (password, confirm) = match password {
        Some(password) => (SecureString::new(password.clone()), SecureString::new(password)),
        None => {
            let password = secret_or_prompt(None, "Password: ")?;
            let confirm = secret_or_prompt(None, "Confirm password: ")?;
            (password, confirm)
        }
    };

    let outcome = AuthService::new(ctx.api(), &ctx.session)
        .with_audit(&ctx.audit)
        .register(email, &password, &confirm)
        .await?;

    match outcome {
        RegisterOutcome::SignedIn => println!("Account created. Signed in as {}", email.trim()),
        RegisterOutcome::LoginRequired => {
            println!("Account created. Run 'fingrid login {}' to sign in.", email.trim())
        }
    }
    Ok(())
}

/// Sign out and forget the cached ledger
pub fn handle_logout(ctx: &AppContext) -> FinGridResult<()> {
    if !ctx.session.status().is_authenticated {
        println!("Not signed in.");
        return Ok(());
    }

    let result = AuthService::new(ctx.api(), &ctx.session)
        .with_audit(&ctx.audit)
        .logout(&ctx.ledger);
    println!("Signed out.");
    result
}

#[derive(Serialize)]
struct StatusView<'a> {
    ready: bool,
    authenticated: bool,
    api_base_url: &'a str,
}

/// Show the session state
pub fn handle_status(ctx: &AppContext, format: OutputFormat) -> FinGridResult<()> {
    let status = ctx.session.status();
    let view = StatusView {
        ready: status.is_ready,
        authenticated: status.is_authenticated,
        api_base_url: ctx.api().base_url(),
    };

    print_output(&view, format, |v| {
        let state = if v.authenticated { "signed in" } else { "signed out" };
        format!("Session: {}\nBackend: {}\n", state, v.api_base_url)
    })
}
