// Asset account endpoints and account actions
//
// Actions that start a server-side job (password/SSH key change and
// check, suspend/restore, elevate/demote) answer with the
// `PasswordActivityLog` of the accepted job. Its outcome is read later
// from `AccountTaskSchedules`.

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::{AccountTaskData, AssetAccount, PasswordActivityLog};

impl ApplianceClient {
    // ── CRUD ─────────────────────────────────────────────────────────

    /// `GET AssetAccounts`
    pub async fn list_asset_accounts(&self, filter: &Filter) -> Result<Vec<AssetAccount>, Error> {
        debug!("listing asset accounts");
        self.get_json("AssetAccounts", &filter.query_pairs()).await
    }

    /// `GET AssetAccounts/{id}`
    pub async fn get_asset_account(&self, id: i64, fields: &[&str]) -> Result<AssetAccount, Error> {
        self.get_json(&format!("AssetAccounts/{id}"), &fields_query(fields))
            .await
    }

    /// `POST AssetAccounts`
    pub async fn create_asset_account(&self, account: &AssetAccount) -> Result<AssetAccount, Error> {
        debug!(name = %account.name, asset_id = account.asset_id, "creating asset account");
        self.post_json("AssetAccounts", account).await
    }

    /// `PUT AssetAccounts/{id}`
    pub async fn update_asset_account(&self, account: &AssetAccount) -> Result<AssetAccount, Error> {
        self.put_json(&format!("AssetAccounts/{}", account.id), account)
            .await
    }

    /// `DELETE AssetAccounts/{id}`
    pub async fn delete_asset_account(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting asset account");
        self.delete(&format!("AssetAccounts/{id}")).await?;
        Ok(())
    }

    // ── Job-starting actions ─────────────────────────────────────────

    async fn account_task(&self, account_id: i64, action: &str) -> Result<PasswordActivityLog, Error> {
        debug!(account_id, action, "starting account task");
        self.post_action(&format!("AssetAccounts/{account_id}/{action}"))
            .await
    }

    /// `POST AssetAccounts/{id}/ChangePassword`
    pub async fn change_password(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "ChangePassword").await
    }

    /// `POST AssetAccounts/{id}/CheckPassword`
    pub async fn check_password(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "CheckPassword").await
    }

    /// `POST AssetAccounts/{id}/ChangeSshKey`
    pub async fn change_ssh_key(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "ChangeSshKey").await
    }

    /// `POST AssetAccounts/{id}/CheckSshKey`
    pub async fn check_ssh_key(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "CheckSshKey").await
    }

    /// `POST AssetAccounts/{id}/DiscoverSshKeys`
    pub async fn discover_ssh_keys(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "DiscoverSshKeys").await
    }

    /// `POST AssetAccounts/{id}/Suspend`
    pub async fn suspend_account(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "Suspend").await
    }

    /// `POST AssetAccounts/{id}/Restore`
    pub async fn restore_account(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "Restore").await
    }

    /// `POST AssetAccounts/{id}/Elevate`
    pub async fn elevate_account(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "Elevate").await
    }

    /// `POST AssetAccounts/{id}/Demote`
    pub async fn demote_account(&self, account_id: i64) -> Result<PasswordActivityLog, Error> {
        self.account_task(account_id, "Demote").await
    }

    // ── Immediate actions ────────────────────────────────────────────

    /// `POST AssetAccounts/{id}/Enable`
    pub async fn enable_account(&self, account_id: i64) -> Result<AssetAccount, Error> {
        debug!(account_id, "enabling account");
        self.post_action(&format!("AssetAccounts/{account_id}/Enable"))
            .await
    }

    /// `POST AssetAccounts/{id}/Disable`
    pub async fn disable_account(&self, account_id: i64) -> Result<AssetAccount, Error> {
        debug!(account_id, "disabling account");
        self.post_action(&format!("AssetAccounts/{account_id}/Disable"))
            .await
    }

    // ── Task history ─────────────────────────────────────────────────

    /// Past jobs run against an account.
    ///
    /// `GET AssetAccounts/{id}/PasswordActivityLog`
    pub async fn list_password_activity(
        &self,
        account_id: i64,
        filter: &Filter,
    ) -> Result<Vec<PasswordActivityLog>, Error> {
        self.get_json(
            &format!("AssetAccounts/{account_id}/PasswordActivityLog"),
            &filter.query_pairs(),
        )
        .await
    }

    /// Latest task outcomes per account.
    ///
    /// `GET AccountTaskSchedules`
    pub async fn list_account_task_schedules(
        &self,
        filter: &Filter,
    ) -> Result<Vec<AccountTaskData>, Error> {
        self.get_json("AccountTaskSchedules", &filter.query_pairs())
            .await
    }
}
