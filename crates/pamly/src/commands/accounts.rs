//! Asset account command handlers, including password jobs.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tokio::task::JoinSet;

use pamly_core::models::{AssetAccount, PasswordActivityLog, TaskName};
use pamly_core::{CoreError, Deadline, Session};

use crate::cli::{AccountsArgs, AccountsCommand, GlobalOpts, TaskArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Account")]
    name: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Password")]
    has_password: String,
    #[tabled(rename = "SSH Key")]
    has_ssh_key: String,
    #[tabled(rename = "Disabled")]
    disabled: String,
}

impl From<&AssetAccount> for AccountRow {
    fn from(a: &AssetAccount) -> Self {
        Self {
            id: a.id,
            name: a.qualified_name(),
            domain: a.domain_name.clone().unwrap_or_default(),
            has_password: util::yes_no(a.has_password),
            has_ssh_key: util::yes_no(a.has_ssh_key),
            disabled: util::yes_no(a.disabled),
        }
    }
}

fn detail(a: &AssetAccount) -> String {
    output::detail_lines(&[
        ("ID", a.id.to_string()),
        ("Name", a.name.clone()),
        ("Description", a.description.clone().unwrap_or_default()),
        ("Domain", a.domain_name.clone().unwrap_or_default()),
        ("Asset", util::fmt_opt(a.asset_name.as_deref())),
        ("Asset ID", a.asset_id.to_string()),
        ("Address", a.asset_network_address.clone().unwrap_or_default()),
        ("Password", util::yes_no(a.has_password)),
        ("SSH Key", util::yes_no(a.has_ssh_key)),
        ("Service Account", util::yes_no(a.is_service_account)),
        ("Disabled", util::yes_no(a.disabled)),
        ("Created", util::fmt_time(a.created_date)),
    ])
}

/// Outcome of one account job, as printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TaskResult {
    account_id: i64,
    account_name: Option<String>,
    task: Option<TaskName>,
    task_id: Option<String>,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TaskResult {
    fn succeeded(&self) -> Option<bool> {
        match self.outcome {
            "succeeded" => Some(true),
            "submitted" => None,
            _ => Some(false),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Task ID")]
    task_id: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: AccountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountsCommand::List(list) => {
            let accounts = session
                .client()
                .list_asset_accounts(&util::list_filter(&list))
                .await?;
            let out = output::render_list(
                &global.output,
                &accounts,
                |a| AccountRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Get { id } => {
            let account = util::lookup(
                session.client().get_asset_account(id, &[]).await,
                "account",
                id,
                "accounts list",
            )?;
            let out = output::render_single(&global.output, &account, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::ChangePassword(task) => {
            run_jobs(session, task, TaskName::ChangePassword, global).await
        }

        AccountsCommand::CheckPassword(task) => {
            run_jobs(session, task, TaskName::CheckPassword, global).await
        }
    }
}

// ── Password jobs ───────────────────────────────────────────────────

/// Start `task` on every account at once and, unless `--wait 0`, follow
/// each job to its outcome.
async fn run_jobs(
    session: &Session,
    args: TaskArgs,
    task: TaskName,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let total = args.ids.len();
    let wait = Duration::from_secs(args.wait);
    let bar = util::spinner(format!("{task}: {total} account(s)"), global);

    let mut jobs = JoinSet::new();
    for account_id in args.ids {
        let session = session.clone();
        jobs.spawn(async move { run_job(&session, account_id, task, wait).await });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(joined) = jobs.join_next().await {
        let result = joined.map_err(|e| CoreError::Internal(format!("job panicked: {e}")))?;
        bar.set_message(format!("{task}: {}/{total} done", results.len() + 1));
        results.push(result);
    }
    bar.finish_and_clear();
    results.sort_by_key(|r| r.account_id);

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &results,
        |r| TaskRow {
            account: r
                .account_name
                .clone()
                .unwrap_or_else(|| r.account_id.to_string()),
            task: util::fmt_opt(r.task),
            task_id: r.task_id.clone().unwrap_or_default(),
            outcome: output::paint_outcome(
                r.error.as_deref().unwrap_or(r.outcome),
                r.succeeded(),
                color,
            ),
        },
        |r| format!("{}\t{}", r.account_id, r.outcome),
    );
    output::print_output(&out, global.quiet);

    let failed = results
        .iter()
        .filter(|r| r.succeeded() == Some(false))
        .count();
    if failed > 0 {
        return Err(CliError::TaskFailed { failed, total });
    }
    Ok(())
}

async fn run_job(session: &Session, account_id: i64, task: TaskName, wait: Duration) -> TaskResult {
    let started = match task {
        TaskName::CheckPassword => session.client().check_password(account_id).await,
        _ => session.client().change_password(account_id).await,
    };
    let log = match started {
        Ok(log) => log,
        Err(e) => return job_error(account_id, None, &CoreError::from(e)),
    };

    if wait.is_zero() {
        return job_result(&log, "submitted", None);
    }

    match session.check_task_state(&log, &Deadline::after(wait)).await {
        Ok(true) => job_result(&log, "succeeded", None),
        Ok(false) => job_result(&log, "failed", None),
        Err(e) if e.is_timeout() => job_result(&log, "timed out", None),
        Err(e) => job_error(account_id, Some(&log), &e),
    }
}

fn job_result(log: &PasswordActivityLog, outcome: &'static str, error: Option<String>) -> TaskResult {
    TaskResult {
        account_id: log.account_id,
        account_name: log.account_name.clone(),
        task: Some(log.name),
        task_id: Some(log.id.clone()),
        outcome,
        error,
    }
}

fn job_error(account_id: i64, log: Option<&PasswordActivityLog>, err: &CoreError) -> TaskResult {
    match log {
        Some(log) => job_result(log, "error", Some(err.to_string())),
        None => TaskResult {
            account_id,
            account_name: None,
            task: None,
            task_id: None,
            outcome: "error",
            error: Some(err.to_string()),
        },
    }
}
