//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use pamly_core::{ApiError, CoreError, Filter, Operator};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;

/// Build the query filter for a list command.
pub fn list_filter(args: &ListArgs) -> Filter {
    let mut filter = Filter::new();
    if let Some(ref search) = args.search {
        filter = filter.and("Name", Operator::IContains, search);
    }
    if let Some(ref field) = args.order_by {
        filter = match field.strip_prefix('-') {
            Some(desc) => filter.order_by_desc(desc),
            None => filter.order_by(field.as_str()),
        };
    }
    filter
}

/// Map a 404 on a single-record lookup to a `NotFound` naming the record.
pub fn lookup<T>(
    result: Result<T, ApiError>,
    resource_type: &str,
    identifier: impl ToString,
    list_command: &str,
) -> Result<T, CliError> {
    result.map_err(|e| match CoreError::from(e) {
        CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.to_string(),
            list_command: list_command.into(),
        },
        other => other.into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Spinner on stderr; hidden when quiet or not attached to a terminal.
pub fn spinner(message: String, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Short UTC timestamp for table cells.
pub fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command, ResourceCommand};

    fn list_args(args: &[&str]) -> ListArgs {
        let mut argv = vec!["pamly", "users", "list"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Users(users) => match users.command {
                ResourceCommand::List(list) => list,
                ResourceCommand::Get { .. } => unreachable!(),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn search_and_descending_order() {
        let filter = list_filter(&list_args(&["--search", "svc", "--order-by", "-Name"]));
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("filter", "Name icontains 'svc'".to_string()),
                ("orderby", "-Name".to_string()),
            ]
        );
    }

    #[test]
    fn no_flags_no_filter() {
        assert!(list_filter(&list_args(&[])).is_empty());
    }

    #[test]
    fn not_found_names_the_record() {
        let err = lookup::<()>(
            Err(ApiError::Api {
                status: 404,
                code: Some(70000),
                message: "gone".into(),
            }),
            "user",
            42,
            "users list",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "user '42' not found");
    }

    #[test]
    fn time_cells() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(fmt_time(Some(t)), "2024-05-01 08:30");
        assert_eq!(fmt_time(None), "");
    }
}
