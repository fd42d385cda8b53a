// ── Asynchronous account tasks ──
//
// Account actions (password change, SSH key check, suspend, ...) are
// server-side jobs. The action call returns a `PasswordActivityLog` right
// away; the outcome only shows up later in the owning account's
// `AccountTaskData` snapshot from `AccountTaskSchedules`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Kind of server-side account job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TaskName {
    CheckPassword,
    ChangePassword,
    CheckSshKey,
    ChangeSshKey,
    DiscoverSshKeys,
    SuspendAccount,
    RestoreAccount,
    ElevateAccount,
    DemoteAccount,
    CheckApiKey,
    ChangeApiKey,
    EnableAccount,
    DisableAccount,
    DiscoverAccounts,
    #[serde(other)]
    Unknown,
}

impl TaskName {
    /// `AccountTaskData` property holding the id of the latest job of this kind.
    ///
    /// `None` for jobs that have no task schedule record.
    pub fn task_id_field(self) -> Option<&'static str> {
        Some(match self {
            Self::CheckPassword => "LastPasswordCheckTaskId",
            Self::ChangePassword => "LastPasswordChangeTaskId",
            Self::CheckSshKey => "LastSshKeyCheckTaskId",
            Self::ChangeSshKey => "LastSshKeyChangeTaskId",
            Self::DiscoverSshKeys => "LastSshKeyDiscoveryTaskId",
            Self::SuspendAccount => "LastSuspendAccountTaskId",
            Self::RestoreAccount => "LastRestoreAccountTaskId",
            Self::ElevateAccount => "LastElevateAccountTaskId",
            Self::DemoteAccount => "LastDemoteAccountTaskId",
            Self::CheckApiKey => "LastApiKeyCheckTaskId",
            Self::ChangeApiKey => "LastApiKeyChangeTaskId",
            Self::EnableAccount | Self::DisableAccount | Self::DiscoverAccounts | Self::Unknown => {
                return None;
            }
        })
    }

    /// Outcome is tracked only by a failure counter, not by timestamps.
    pub fn is_counter_based(self) -> bool {
        matches!(self, Self::CheckApiKey | Self::ChangeApiKey)
    }
}

/// One accepted account job, returned by the account action endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PasswordActivityLog {
    /// Job id (UUID).
    pub id: String,
    pub log_time: DateTime<Utc>,
    pub account_id: i64,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub asset_id: Option<i64>,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub name: TaskName,
}

/// Latest task outcomes for one account, from `GET AccountTaskSchedules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountTaskData {
    pub account_id: i64,
    pub account_name: Option<String>,
    pub asset_id: Option<i64>,
    pub asset_name: Option<String>,

    #[serde(with = "super::timestamp")]
    pub last_success_password_check_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_password_check_date: Option<DateTime<Utc>>,
    pub last_password_check_task_id: Option<String>,
    pub failed_password_check_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_password_change_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_password_change_date: Option<DateTime<Utc>>,
    pub last_password_change_task_id: Option<String>,
    pub failed_password_change_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_ssh_key_check_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_ssh_key_check_date: Option<DateTime<Utc>>,
    pub last_ssh_key_check_task_id: Option<String>,
    pub failed_ssh_key_check_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_ssh_key_change_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_ssh_key_change_date: Option<DateTime<Utc>>,
    pub last_ssh_key_change_task_id: Option<String>,
    pub failed_ssh_key_change_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_ssh_key_discovery_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_ssh_key_discovery_date: Option<DateTime<Utc>>,
    pub last_ssh_key_discovery_task_id: Option<String>,
    pub failed_ssh_key_discovery_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_suspend_account_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_suspend_account_date: Option<DateTime<Utc>>,
    pub last_suspend_account_task_id: Option<String>,
    pub failed_suspend_account_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_restore_account_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_restore_account_date: Option<DateTime<Utc>>,
    pub last_restore_account_task_id: Option<String>,
    pub failed_restore_account_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_elevate_account_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_elevate_account_date: Option<DateTime<Utc>>,
    pub last_elevate_account_task_id: Option<String>,
    pub failed_elevate_account_attempts: u32,

    #[serde(with = "super::timestamp")]
    pub last_success_demote_account_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_failure_demote_account_date: Option<DateTime<Utc>>,
    pub last_demote_account_task_id: Option<String>,
    pub failed_demote_account_attempts: u32,

    pub last_api_key_check_task_id: Option<String>,
    pub failed_api_key_check_attempts: u32,
    pub last_api_key_change_task_id: Option<String>,
    pub failed_api_key_change_attempts: u32,
}

/// The slice of `AccountTaskData` that tracks one kind of job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRecord<'a> {
    pub task_id: Option<&'a str>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub failed_attempts: u32,
}

impl AccountTaskData {
    /// Fields tracking `task`, or `None` if this record has none for it.
    pub fn task_record(&self, task: TaskName) -> Option<TaskRecord<'_>> {
        let (task_id, last_success, last_failure, failed_attempts) = match task {
            TaskName::CheckPassword => (
                &self.last_password_check_task_id,
                self.last_success_password_check_date,
                self.last_failure_password_check_date,
                self.failed_password_check_attempts,
            ),
            TaskName::ChangePassword => (
                &self.last_password_change_task_id,
                self.last_success_password_change_date,
                self.last_failure_password_change_date,
                self.failed_password_change_attempts,
            ),
            TaskName::CheckSshKey => (
                &self.last_ssh_key_check_task_id,
                self.last_success_ssh_key_check_date,
                self.last_failure_ssh_key_check_date,
                self.failed_ssh_key_check_attempts,
            ),
            TaskName::ChangeSshKey => (
                &self.last_ssh_key_change_task_id,
                self.last_success_ssh_key_change_date,
                self.last_failure_ssh_key_change_date,
                self.failed_ssh_key_change_attempts,
            ),
            TaskName::DiscoverSshKeys => (
                &self.last_ssh_key_discovery_task_id,
                self.last_success_ssh_key_discovery_date,
                self.last_failure_ssh_key_discovery_date,
                self.failed_ssh_key_discovery_attempts,
            ),
            TaskName::SuspendAccount => (
                &self.last_suspend_account_task_id,
                self.last_success_suspend_account_date,
                self.last_failure_suspend_account_date,
                self.failed_suspend_account_attempts,
            ),
            TaskName::RestoreAccount => (
                &self.last_restore_account_task_id,
                self.last_success_restore_account_date,
                self.last_failure_restore_account_date,
                self.failed_restore_account_attempts,
            ),
            TaskName::ElevateAccount => (
                &self.last_elevate_account_task_id,
                self.last_success_elevate_account_date,
                self.last_failure_elevate_account_date,
                self.failed_elevate_account_attempts,
            ),
            TaskName::DemoteAccount => (
                &self.last_demote_account_task_id,
                self.last_success_demote_account_date,
                self.last_failure_demote_account_date,
                self.failed_demote_account_attempts,
            ),
            TaskName::CheckApiKey => (
                &self.last_api_key_check_task_id,
                None,
                None,
                self.failed_api_key_check_attempts,
            ),
            TaskName::ChangeApiKey => (
                &self.last_api_key_change_task_id,
                None,
                None,
                self.failed_api_key_change_attempts,
            ),
            TaskName::EnableAccount
            | TaskName::DisableAccount
            | TaskName::DiscoverAccounts
            | TaskName::Unknown => return None,
        };
        Some(TaskRecord {
            task_id: task_id.as_deref(),
            last_success,
            last_failure,
            failed_attempts,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn mapped_tasks_have_records_and_unmapped_do_not() {
        let data = AccountTaskData::default();
        for task in TaskName::iter() {
            assert_eq!(
                task.task_id_field().is_some(),
                data.task_record(task).is_some(),
                "{task}"
            );
        }
        assert_eq!(TaskName::Unknown.task_id_field(), None);
        assert_eq!(TaskName::EnableAccount.task_id_field(), None);
    }

    #[test]
    fn task_id_field_matches_wire_property() {
        let data: AccountTaskData = serde_json::from_str(
            r#"{"AccountId": 3, "LastSshKeyDiscoveryTaskId": "6b2e6a30-6a0e-4a38-9e7c-5b0a1d2c3e4f"}"#,
        )
        .unwrap();
        let wire = serde_json::to_value(&data).unwrap();
        assert_eq!(
            wire[TaskName::DiscoverSshKeys.task_id_field().unwrap()],
            "6b2e6a30-6a0e-4a38-9e7c-5b0a1d2c3e4f"
        );
        for task in TaskName::iter() {
            if let Some(field) = task.task_id_field() {
                assert!(wire.get(field).is_some(), "{field} is not a property");
            }
        }
    }

    #[test]
    fn change_password_record_reads_its_own_fields() {
        let data: AccountTaskData = serde_json::from_str(
            r#"{
                "AccountId": 3,
                "LastPasswordChangeTaskId": "aa",
                "LastSuccessPasswordChangeDate": "2024-05-01T08:00:01Z",
                "LastFailurePasswordChangeDate": "0001-01-01T00:00:00Z",
                "FailedPasswordChangeAttempts": 0,
                "LastPasswordCheckTaskId": "bb"
            }"#,
        )
        .unwrap();
        let record = data.task_record(TaskName::ChangePassword).unwrap();
        assert_eq!(record.task_id, Some("aa"));
        assert_eq!(
            record.last_success,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 1).unwrap())
        );
        assert_eq!(record.last_failure, None);
    }

    #[test]
    fn unknown_task_names_decode_as_unknown() {
        let name: TaskName = serde_json::from_str("\"RotateCertificate\"").unwrap();
        assert_eq!(name, TaskName::Unknown);
        assert!(TaskName::ChangeApiKey.is_counter_based());
        assert!(!TaskName::ChangePassword.is_counter_based());
    }
}
