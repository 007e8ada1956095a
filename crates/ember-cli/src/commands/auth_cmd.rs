use ember_core::auth::Session;

use crate::commands::common::{clear_session, save_session, AppContext};
use crate::error::CliError;

pub fn run_login(
    ctx: &AppContext,
    user_id: String,
    token: String,
    expires_at: Option<i64>,
) -> Result<(), CliError> {
    let mut session = Session::new(user_id, token);
    session.expires_at = expires_at;

    save_session(&ctx.session_path, &session)?;
    ctx.sessions.set(session.clone());

    println!("Signed in as {}", session.user_id);
    if session.is_expired() {
        println!("Warning: the provided token is already expired; sync will be skipped");
    }
    Ok(())
}

pub fn run_logout(ctx: &AppContext) -> Result<(), CliError> {
    clear_session(&ctx.session_path)?;
    ctx.sessions.clear();
    println!("Signed out");
    Ok(())
}
