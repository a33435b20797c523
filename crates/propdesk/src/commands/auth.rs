//! Session commands: login, logout, whoami, register.

use secrecy::SecretString;

use propdesk_core::Desk;
use propdesk_core::models::Registration;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    desk: &Desk,
    args: LoginArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = resolved.profile.clone().unwrap_or_default();
    let name = &resolved.profile_name;

    // 1. Username: flag, then profile / PROPDESK_USERNAME, then prompt
    let username = match args.username {
        Some(u) => u,
        None => match propdesk_config::resolve_username(&profile, name) {
            Ok(u) => u,
            Err(_) => dialoguer::Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(util::prompt_err)?,
        },
    };

    // 2. Password: credential chain, then prompt
    let password = match propdesk_config::resolve_password(&profile, name) {
        Ok(secret) => secret,
        Err(_) => SecretString::from(util::prompt_secret("Password: ")?),
    };

    let session = util::with_spinner(global, "Logging in...", desk.login(&username, &password)).await?;
    output::notice(
        &format!("✓ Logged in as {} (profile '{name}')", session.username),
        global.quiet,
    );
    Ok(())
}

pub fn logout(desk: &Desk, global: &GlobalOpts) -> Result<(), CliError> {
    desk.logout()?;
    output::notice("✓ Logged out", global.quiet);
    Ok(())
}

pub async fn whoami(desk: &Desk, global: &GlobalOpts) -> Result<(), CliError> {
    let user = util::with_spinner(global, "Checking session...", desk.verify()).await?;
    let out = output::render_single(
        global.output,
        &user,
        |u| {
            output::detail_lines(&[
                ("User", u.username.clone()),
                ("ID", output::or_dash(u.id)),
                ("Role", output::or_dash(u.role.as_ref())),
            ])
        },
        |u| u.username.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(desk: &Desk, args: RegisterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let first = desk.check_first_user().await.unwrap_or(false);
    if first {
        output::notice("This will be the first account on the server.", global.quiet);
    }

    let password = util::prompt_secret("Password: ")?;
    let confirm = util::prompt_secret("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }

    let registration = Registration {
        username: args.username,
        email: args.email,
        password,
    };
    match desk.register(&registration).await? {
        Some(session) => output::notice(
            &format!("✓ Registered and logged in as {}", session.username),
            global.quiet,
        ),
        None => output::notice(
            "✓ Registered. Log in with: propdesk login",
            global.quiet,
        ),
    }
    Ok(())
}
