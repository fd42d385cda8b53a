//! Access policy command handlers.

use tabled::Tabled;

use pamly_core::{Filter, Session};
use pamly_core::models::AccessPolicy;

use crate::cli::{GlobalOpts, OutputFormat, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PolicyRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Expired")]
    expired: String,
}

impl From<&AccessPolicy> for PolicyRow {
    fn from(p: &AccessPolicy) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            role: p.role_name.clone().unwrap_or_default(),
            kind: util::fmt_opt(p.access_request_type()),
            priority: p.priority,
            expired: util::yes_no(p.is_expired),
        }
    }
}

fn detail(p: &AccessPolicy, accounts: &[String]) -> String {
    let props = &p.access_request_properties;
    let reasons = p
        .reason_codes()
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Description", p.description.clone().unwrap_or_default()),
        ("Role", p.role_name.clone().unwrap_or_default()),
        ("Type", util::fmt_opt(p.access_request_type())),
        (
            "Default Duration",
            util::fmt_opt(props.default_release_duration_minutes.map(|m| format!("{m} min"))),
        ),
        (
            "Max Duration",
            util::fmt_opt(props.maximum_release_duration_days.map(|d| format!("{d} days"))),
        ),
        ("Simultaneous", util::yes_no(props.allow_simultaneous_access)),
        ("Reset On Checkin", util::yes_no(props.change_password_after_checkin)),
        ("Reason Required", util::yes_no(p.requester_properties.require_reason_code)),
        ("Reason Codes", reasons),
        ("Accounts", accounts.join(", ")),
    ])
}

pub async fn handle(
    session: &Session,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let policies = session
                .client()
                .list_access_policies(&util::list_filter(&list))
                .await?;
            let out = output::render_list(
                &global.output,
                &policies,
                |p| PolicyRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let policy = util::lookup(
                session.client().get_access_policy(id, &[]).await,
                "access policy",
                id,
                "policies list",
            )?;

            // The detail view lists scoped accounts; structured output is the bare record.
            let accounts = if matches!(global.output, OutputFormat::Table) {
                session
                    .client()
                    .list_policy_accounts(id, &Filter::new())
                    .await?
                    .iter()
                    .map(|a| match a.asset_name {
                        Some(ref asset) => format!("{}@{asset}", a.name),
                        None => a.name.clone(),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let out = output::render_single(
                &global.output,
                &policy,
                |p| detail(p, &accounts),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
