//! User command handlers.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::{Role, User, UserForm};

use crate::cli::{GlobalOpts, UserFields, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Properties")]
    properties: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: output::or_dash(u.email.as_ref()),
            role: output::or_dash(u.role.as_ref()),
            group: output::or_dash(u.group.as_ref()),
            properties: join_ids(&u.assigned_properties),
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        return "-".into();
    }
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn detail(u: &User) -> String {
    output::detail_lines(&[
        ("ID", u.id.to_string()),
        ("Username", u.username.clone()),
        ("Email", output::or_dash(u.email.as_ref())),
        ("Role", output::or_dash(u.role.as_ref())),
        ("Group", output::or_dash(u.group.as_ref())),
        ("Properties", join_ids(&u.assigned_properties)),
    ])
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(current: Option<&User>, fields: UserFields) -> Result<UserForm, CliError> {
    let mut form: UserForm = if let Some(ref path) = fields.from_file {
        util::read_json_file(path)?
    } else {
        let mut form = current.map_or_else(UserForm::default, |u| UserForm {
            username: u.username.clone(),
            email: u.email.clone(),
            password: None,
            role: u.role.clone(),
            group: u.group.clone(),
            assigned_properties: u.assigned_properties.clone(),
        });
        if let Some(username) = fields.username {
            form.username = username;
        }
        if fields.email.is_some() {
            form.email = fields.email;
        }
        if let Some(role) = fields.role {
            form.role = Some(Role::parse(&role));
        }
        if fields.group.is_some() {
            form.group = fields.group;
        }
        if !fields.assigned_properties.is_empty() {
            form.assigned_properties = fields.assigned_properties;
        }
        form
    };

    // New accounts always need a password; updates only when asked.
    if (current.is_none() || fields.password) && form.password.is_none() {
        form.password = Some(util::prompt_secret("New password: ")?);
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &Desk, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = util::with_spinner(global, "Loading users...", desk.users()).await?;
            let out = output::render_list(global.output, &users, |u| UserRow::from(u), |u| u.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Managers => {
            let users = util::with_spinner(global, "Loading managers...", desk.managers()).await?;
            let out = output::render_list(global.output, &users, |u| UserRow::from(u), |u| u.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = desk
                .user(id)
                .await
                .map_err(|e| CliError::not_found(e, "users list"))?;
            let out = output::render_single(global.output, &user, detail, |u| u.username.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create(fields) => {
            let form = form_from(None, fields)?;
            let created = desk.create_user(&form).await?;
            output::notice(
                &format!("✓ User {} created (#{})", created.username, created.id),
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Update { id, fields } => {
            let current = desk
                .user(id)
                .await
                .map_err(|e| CliError::not_found(e, "users list"))?;
            let form = form_from(Some(&current), fields)?;
            desk.update_user(id, &form).await?;
            output::notice("✓ User updated", global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user #{id}?"), global.yes)? {
                return Ok(());
            }
            desk.delete_user(id).await?;
            output::notice("✓ User deleted", global.quiet);
            Ok(())
        }
    }
}
