//! Asset command handlers.

use tabled::Tabled;

use pamly_core::Session;
use pamly_core::models::Asset;

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Partition")]
    partition: String,
    #[tabled(rename = "Disabled")]
    disabled: String,
}

impl From<&Asset> for AssetRow {
    fn from(a: &Asset) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            address: a.network_address.clone().unwrap_or_default(),
            platform: a.platform_display_name.clone().unwrap_or_default(),
            partition: a.asset_partition_name.clone().unwrap_or_default(),
            disabled: util::yes_no(a.disabled),
        }
    }
}

fn detail(a: &Asset) -> String {
    output::detail_lines(&[
        ("ID", a.id.to_string()),
        ("Name", a.name.clone()),
        ("Description", a.description.clone().unwrap_or_default()),
        ("Address", a.network_address.clone().unwrap_or_default()),
        ("Platform", a.platform_display_name.clone().unwrap_or_default()),
        ("Partition", a.asset_partition_name.clone().unwrap_or_default()),
        ("Disabled", util::yes_no(a.disabled)),
        ("Created", util::fmt_time(a.created_date)),
    ])
}

pub async fn handle(
    session: &Session,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let assets = session.client().list_assets(&util::list_filter(&list)).await?;
            let out = output::render_list(
                &global.output,
                &assets,
                |a| AssetRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let asset = util::lookup(
                session.client().get_asset(id, &[]).await,
                "asset",
                id,
                "assets list",
            )?;
            let out = output::render_single(&global.output, &asset, detail, |a| a.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
