use tracing::{info, warn};

use crate::browser::driver::LoadState;
use crate::browser::locator::{Locator, LocatorChain};
use crate::error::{JourneyError, Result};
use crate::journey::context::RunContext;
use crate::journey::result_model::LoginOutcome;
use crate::persona::persona_model::PersonaRecord;

const URL_MARKERS: [&str; 2] = ["login", "signin"];

/// Whether the page is asking for authentication: a login marker in the URL
/// or a password field anywhere on the page.
pub fn login_required(ctx: &mut RunContext<'_>) -> Result<bool> {
    let url = ctx.driver.current_url()?.to_lowercase();
    if URL_MARKERS.iter().any(|m| url.contains(m)) {
        return Ok(true);
    }
    Ok(LocatorChain::password_input()
        .resolve(&mut *ctx.driver)?
        .is_some())
}

/// Detect a login surface and, with credentials, try to get past it.
///
/// Failures are folded into the outcome; they never stop the run.
pub fn attempt_login(ctx: &mut RunContext<'_>, persona: &PersonaRecord) -> LoginOutcome {
    let required = match login_required(ctx) {
        Ok(required) => required,
        Err(e) => {
            warn!(error = %e, "could not inspect page for a login form");
            return LoginOutcome::fail(e.to_string());
        }
    };

    if !required {
        return LoginOutcome::skip("No login form detected; continuing unauthenticated");
    }

    let Some((email, password)) = persona.credentials() else {
        return LoginOutcome::skip(format!(
            "Login form detected but persona '{}' has no test credentials",
            persona.id
        ));
    };

    match submit_credentials(ctx, email, password) {
        Ok(()) => {
            info!(email, "login submitted");
            LoginOutcome::pass(format!("Logged in as {}", email))
        }
        Err(e) => {
            warn!(error = %e, "login attempt failed");
            LoginOutcome::fail(e.to_string())
        }
    }
}

fn submit_credentials(ctx: &mut RunContext<'_>, email: &str, password: &str) -> Result<()> {
    let email_input = require(ctx, &LocatorChain::email_input(), "email input")?;
    let password_input = require(ctx, &LocatorChain::password_input(), "password input")?;

    ctx.driver.fill(&email_input, email)?;
    ctx.driver.fill(&password_input, password)?;

    let submit = require(ctx, &LocatorChain::submit_control(), "submit button")?;
    ctx.driver.click(&submit)?;
    ctx.driver.wait_for_load_state(LoadState::NetworkIdle, ctx.timeout)
}

fn require(ctx: &mut RunContext<'_>, chain: &LocatorChain, what: &str) -> Result<Locator> {
    chain
        .resolve(&mut *ctx.driver)?
        .ok_or_else(|| JourneyError::ElementNotFound {
            element: what.to_string(),
            context: "login form".to_string(),
        })
}
