//! User command handlers.

use tabled::Tabled;

use pamly_core::Session;
use pamly_core::models::User;

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Disabled")]
    disabled: String,
    #[tabled(rename = "Last Login")]
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            display_name: u.display_name.clone().unwrap_or_default(),
            provider: u.identity_provider_name.clone().unwrap_or_default(),
            disabled: util::yes_no(u.disabled),
            last_login: util::fmt_time(u.last_login_date),
        }
    }
}

fn detail(u: &User) -> String {
    output::detail_lines(&[
        ("ID", u.id.to_string()),
        ("Name", u.name.clone()),
        ("Display Name", u.display_name.clone().unwrap_or_default()),
        ("Email", u.email_address.clone().unwrap_or_default()),
        ("Description", u.description.clone().unwrap_or_default()),
        ("Provider", u.identity_provider_name.clone().unwrap_or_default()),
        ("Admin Roles", u.admin_roles.join(", ")),
        ("Disabled", util::yes_no(u.disabled)),
        ("Locked", util::yes_no(u.locked)),
        ("Created", util::fmt_time(u.created_date)),
        ("Last Login", util::fmt_time(u.last_login_date)),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let users = session.client().list_users(&util::list_filter(&list)).await?;
            let out = output::render_list(
                &global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let user = util::lookup(
                session.client().get_user(id, &[]).await,
                "user",
                id,
                "users list",
            )?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
