//! Cluster command handlers.

use tabled::Tabled;

use pamly_core::{Filter, Session};
use pamly_core::models::ClusterMember;

use crate::cli::{ClusterArgs, ClusterCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Leader")]
    leader: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Version")]
    version: String,
}

impl From<&ClusterMember> for MemberRow {
    fn from(m: &ClusterMember) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            hostname: m.hostname.clone().unwrap_or_default(),
            leader: util::yes_no(m.is_leader),
            online: util::yes_no(m.is_online),
            version: m.appliance_version.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    session: &Session,
    args: ClusterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClusterCommand::Members => {
            let members = session.client().list_cluster_members(&Filter::new()).await?;
            let out = output::render_list(
                &global.output,
                &members,
                |m| MemberRow::from(m),
                |m| m.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
