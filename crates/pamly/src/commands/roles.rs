//! Role command handlers.

use tabled::Tabled;

use pamly_core::Session;
use pamly_core::models::Role;

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Members")]
    members: usize,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            priority: r.priority,
            members: r.members.len(),
        }
    }
}

fn detail(r: &Role) -> String {
    let members = r
        .members
        .iter()
        .map(|m| match m.principal_kind {
            Some(ref kind) => format!("{} ({kind})", m.name),
            None => m.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_lines(&[
        ("ID", r.id.to_string()),
        ("Name", r.name.clone()),
        ("Description", r.description.clone().unwrap_or_default()),
        ("Priority", r.priority.to_string()),
        ("Members", members),
    ])
}

pub async fn handle(
    session: &Session,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let roles = session.client().list_roles(&util::list_filter(&list)).await?;
            let out = output::render_list(
                &global.output,
                &roles,
                |r| RoleRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let role = util::lookup(
                session.client().get_role(id, &[]).await,
                "role",
                id,
                "roles list",
            )?;
            let out = output::render_single(&global.output, &role, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
