// ── Account task polling ──
//
// An account action returns its `PasswordActivityLog` as soon as the job
// is accepted. The outcome is read from the account's task schedule
// record: the one whose last-task-id for the job's type equals the log id.
// That record may not be visible right away, so resolution is retried on
// every tick along with the outcome check.

use chrono::{DateTime, Utc};
use pamly_api::models::{AccountTaskData, PasswordActivityLog, TaskName};
use pamly_api::{Filter, Operator};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::session::Session;

impl Session {
    /// Wait for the job behind `log` to finish.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` on failure. The task
    /// schedule is checked immediately and then every `task_interval`
    /// until an outcome is visible or `deadline` expires.
    pub async fn check_task_state(
        &self,
        log: &PasswordActivityLog,
        deadline: &Deadline,
    ) -> Result<bool, CoreError> {
        let task_id = Uuid::parse_str(&log.id).map_err(|_| CoreError::InvalidTaskId {
            id: log.id.clone(),
        })?;
        let field = log
            .name
            .task_id_field()
            .ok_or(CoreError::UnsupportedTask { task: log.name })?;
        let filter = Filter::new()
            .and("AccountId", Operator::Equal, log.account_id)
            .and(field, Operator::IEqual, log.id.as_str());

        debug!(task = %log.name, %task_id, account_id = log.account_id, "waiting for task");
        let timeout = || CoreError::Timeout {
            waiting_for: format!("{} task {task_id}", log.name),
        };
        let mut interval = tokio::time::interval(self.poll_config().task_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await; // consume the immediate first tick

        let expired = deadline.expired();
        tokio::pin!(expired);

        loop {
            let outcome = tokio::select! {
                biased;
                () = &mut expired => return Err(timeout()),
                outcome = self.task_outcome(log, task_id, &filter) => outcome?,
            };
            if let Some(success) = outcome {
                info!(task = %log.name, %task_id, success, "task finished");
                return Ok(success);
            }
            // The next tick counts from the end of this poll.
            interval.reset();

            tokio::select! {
                biased;
                () = &mut expired => return Err(timeout()),
                _ = interval.tick() => {}
            }
        }
    }

    /// One resolve-and-evaluate pass. `None` means "not yet known".
    async fn task_outcome(
        &self,
        log: &PasswordActivityLog,
        task_id: Uuid,
        filter: &Filter,
    ) -> Result<Option<bool>, CoreError> {
        let records = self.client().list_account_task_schedules(filter).await?;
        let Some(record) = find_task_record(&records, log.name, task_id) else {
            trace!(%task_id, "task record not visible yet");
            return Ok(None);
        };
        Ok(evaluate(record, log.name, log.log_time))
    }
}

/// The record whose last task id for `task` is `task_id`.
fn find_task_record(
    records: &[AccountTaskData],
    task: TaskName,
    task_id: Uuid,
) -> Option<&AccountTaskData> {
    records.iter().find(|data| {
        data.task_record(task)
            .and_then(|r| r.task_id)
            .and_then(|id| Uuid::parse_str(id).ok())
            == Some(task_id)
    })
}

/// Outcome of `task` as recorded in `data`, relative to a job logged at `since`.
///
/// Counter-based tasks are decided by their failure counter alone. Others
/// succeed if the last success is at or after `since`, else fail if the
/// last failure is; success is checked first.
fn evaluate(data: &AccountTaskData, task: TaskName, since: DateTime<Utc>) -> Option<bool> {
    let record = data.task_record(task)?;
    if task.is_counter_based() {
        return Some(record.failed_attempts == 0);
    }
    if record.last_success.is_some_and(|t| t >= since) {
        return Some(true);
    }
    if record.last_failure.is_some_and(|t| t >= since) {
        return Some(false);
    }
    None
}
