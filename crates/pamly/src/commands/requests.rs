//! Access request command handlers.

use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use pamly_core::models::{AccessRequest, AccountEntitlement, BatchResponse};
use pamly_core::{CoreError, Deadline, Filter, Operator, RequestOptions, Session};

use crate::cli::{CreateRequestArgs, GlobalOpts, OutputFormat, RequestsArgs, RequestsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl RequestRow {
    fn new(r: &AccessRequest, color: bool) -> Self {
        Self {
            id: r.id.clone(),
            kind: util::fmt_opt(r.access_request_type),
            state: output::paint_state(r.state, color),
            account: r.account_name.clone().unwrap_or_default(),
            asset: r.asset_name.clone().unwrap_or_default(),
            requester: r.requester_display_name.clone().unwrap_or_default(),
            expires: util::fmt_time(r.expires_on),
        }
    }
}

fn detail(r: &AccessRequest, color: bool) -> String {
    let remaining = r
        .expires_on
        .and_then(|at| (at - Utc::now()).to_std().ok())
        .map(|left| {
            // Whole minutes read better than humantime's nanosecond tail.
            let left = Duration::from_secs(left.as_secs() / 60 * 60);
            format!("in {}", humantime::format_duration(left))
        })
        .unwrap_or_default();
    let history = r
        .workflow_actions
        .iter()
        .map(|a| {
            let who = a.user_display_name.as_deref().unwrap_or("-");
            format!("{} {} by {who}", util::fmt_time(a.occurred), a.action_type)
        })
        .collect::<Vec<_>>()
        .join("; ");
    output::detail_lines(&[
        ("ID", r.id.clone()),
        ("Type", util::fmt_opt(r.access_request_type)),
        ("State", output::paint_state(r.state, color)),
        ("Account", r.account_name.clone().unwrap_or_default()),
        ("Asset", r.asset_name.clone().unwrap_or_default()),
        ("Requester", r.requester_display_name.clone().unwrap_or_default()),
        (
            "Duration",
            util::fmt_opt(r.requested_duration_minutes.map(|m| format!("{m} min"))),
        ),
        ("Reason", r.reason_code.clone().unwrap_or_default()),
        ("Comment", r.reason_comment.clone().unwrap_or_default()),
        ("Created", util::fmt_time(r.created_on)),
        ("Expires", util::fmt_time(r.expires_on)),
        ("Remaining", remaining),
        ("History", history),
    ])
}

#[derive(Tabled)]
struct EntitlementRow {
    #[tabled(rename = "Account ID")]
    account_id: i64,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Policies")]
    policies: String,
}

impl From<&AccountEntitlement> for EntitlementRow {
    fn from(e: &AccountEntitlement) -> Self {
        Self {
            account_id: e.account.id,
            account: e.account.name.clone(),
            asset: e.asset.name.clone(),
            kind: util::fmt_opt(e.access_request_type()),
            policies: e
                .policies
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Structured checkout output.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Checkout<'a> {
    id: &'a str,
    password: &'a str,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: RequestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        RequestsCommand::List { state, list } => {
            let mut filter = util::list_filter(&list);
            if let Some(state) = state {
                filter = filter.and("State", Operator::Equal, state);
            }
            let requests = session.client().list_access_requests(&filter).await?;
            let out = output::render_list(
                &global.output,
                &requests,
                |r| RequestRow::new(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RequestsCommand::Entitlements(list) => {
            let entitlements = session
                .client()
                .list_request_entitlements(&util::list_filter(&list))
                .await?;
            let out = output::render_list(
                &global.output,
                &entitlements,
                |e| EntitlementRow::from(e),
                |e| e.account.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RequestsCommand::Create(create) => create_requests(session, create, global, color).await,

        RequestsCommand::Checkout { id, wait } => {
            let request = fetch(session, &id).await?;
            check_out(session, &request, wait, global).await
        }

        RequestsCommand::Close { id } => {
            let request = fetch(session, &id).await?;
            let closed = session.close_access_request(&request).await?;
            print_request(&closed, global, color);
            Ok(())
        }

        RequestsCommand::Cancel { id } => {
            let request = fetch(session, &id).await?;
            if !util::confirm(&format!("Cancel access request {id}?"), global.yes)? {
                return Ok(());
            }
            let canceled = session.cancel_access_request(&request).await?;
            print_request(&canceled, global, color);
            Ok(())
        }

        RequestsCommand::Checkin { id } => {
            let request = fetch(session, &id).await?;
            let checked_in = session.check_in_access_request(&request).await?;
            print_request(&checked_in, global, color);
            Ok(())
        }
    }
}

async fn fetch(session: &Session, id: &str) -> Result<AccessRequest, CliError> {
    util::lookup(
        session.client().get_access_request(id, &[]).await,
        "access request",
        id,
        "requests list",
    )
}

fn print_request(request: &AccessRequest, global: &GlobalOpts, color: bool) {
    let out = output::render_single(
        &global.output,
        request,
        |r| detail(r, color),
        |r| format!("{}\t{}", r.id, r.state),
    );
    output::print_output(&out, global.quiet);
}

// ── Create ──────────────────────────────────────────────────────────

async fn create_requests(
    session: &Session,
    args: CreateRequestArgs,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let available = session
        .client()
        .list_request_entitlements(&Filter::new())
        .await?;

    let mut selected = Vec::with_capacity(args.accounts.len());
    for account_id in &args.accounts {
        let entitlement = available
            .iter()
            .find(|e| e.account.id == *account_id)
            .ok_or_else(|| CliError::NotFound {
                resource_type: "entitlement for account".into(),
                identifier: account_id.to_string(),
                list_command: "requests entitlements".into(),
            })?;
        selected.push(entitlement.clone());
    }

    let options = RequestOptions {
        requested_duration_minutes: args.duration,
        requester_username: args.requester,
        reason_code: args.reason_code,
        reason_comment: args.comment,
    };

    match session.create_access_requests(&selected, &options).await {
        Ok(results) => {
            print_created(&results, global, color);
            Ok(())
        }
        Err(CoreError::PartialBatch { results, message }) => {
            // Requests that did go through still need to be visible.
            print_created(&results, global, color);
            Err(CliError::PartialBatch { message })
        }
        Err(e) => Err(e.into()),
    }
}

fn print_created(results: &[BatchResponse<AccessRequest>], global: &GlobalOpts, color: bool) {
    let created: Vec<AccessRequest> = results
        .iter()
        .filter_map(|entry| entry.response.clone())
        .collect();
    let out = output::render_list(
        &global.output,
        &created,
        |r| RequestRow::new(r, color),
        |r| r.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

// ── Checkout ────────────────────────────────────────────────────────

async fn check_out(
    session: &Session,
    request: &AccessRequest,
    wait: u64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let deadline = Deadline::from_token(cancel.clone()).with_timeout(Duration::from_secs(wait));

    // Ctrl-C stops the wait cleanly instead of killing the process mid-request.
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let bar = if wait > 0 && request.is_pending() {
        util::spinner(format!("waiting for {} ({})", request.id, request.state), global)
    } else {
        indicatif::ProgressBar::hidden()
    };
    let result = session
        .check_out_password(request, wait > 0, &deadline)
        .await;
    bar.finish_and_clear();
    watcher.abort();

    let password = match result {
        Err(CoreError::Timeout { .. }) if cancel.is_cancelled() => {
            return Err(CliError::Timeout {
                waiting_for: format!("access request {} (interrupted)", request.id),
            });
        }
        other => other?,
    };

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => password.expose_secret().to_owned(),
        _ => output::render_single(
            &global.output,
            &Checkout {
                id: &request.id,
                password: password.expose_secret(),
            },
            |_| String::new(),
            |_| String::new(),
        ),
    };
    // The secret is the payload; --quiet only silences chatter around it.
    output::print_output(&out, false);
    Ok(())
}
