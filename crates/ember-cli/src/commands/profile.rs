use ember_core::db::ProfileStore as _;
use ember_core::UserProfile;

use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_profile_show(ctx: &AppContext, as_json: bool) -> Result<(), CliError> {
    let session = ctx.current_session()?;

    // Prefer a fresh copy; any remote trouble falls back to the cache
    let refreshed = match ctx.engine() {
        Ok(engine) => match engine.refresh_profile().await {
            Ok(profile) => profile,
            Err(error) => {
                tracing::warn!(%error, "profile refresh failed; showing cached copy");
                None
            }
        },
        Err(CliError::MissingRemoteUrl) => None,
        Err(error) => return Err(error),
    };

    let profile = match refreshed {
        Some(profile) => Some(profile),
        None => ctx.profiles.get(&session.user_id).await?,
    };

    let Some(profile) = profile else {
        println!("No profile yet. Create one with: ember profile set --name \"Your Name\"");
        return Ok(());
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("user:   {}", session.user_id);
        println!("name:   {}", profile.display_name);
        println!("email:  {}", profile.email);
        if let Some(avatar) = &profile.avatar_ref {
            println!("avatar: {avatar}");
        }
    }
    Ok(())
}

pub async fn run_profile_set(
    ctx: &AppContext,
    name: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
) -> Result<(), CliError> {
    let session = ctx.current_session()?;
    let engine = ctx.engine()?;

    let mut profile = ctx
        .profiles
        .get(&session.user_id)
        .await?
        .unwrap_or_else(|| UserProfile::new(&session.user_id));

    if let Some(name) = name {
        profile.display_name = name;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if let Some(avatar) = avatar {
        profile.avatar_ref = Some(avatar);
    }

    // Foreground write: remote first, mirrored into the cache; failures
    // surface here rather than being swallowed like background sync
    engine.save_profile(&profile).await?;
    println!("Profile saved");
    Ok(())
}
