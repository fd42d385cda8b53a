//! Identity provider command handlers.

use tabled::Tabled;

use pamly_core::Session;
use pamly_core::models::IdentityProvider;

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Login ID")]
    rsts_id: String,
}

impl From<&IdentityProvider> for ProviderRow {
    fn from(p: &IdentityProvider) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            kind: p.type_reference_name.clone().unwrap_or_default(),
            rsts_id: p.rsts_provider_id.clone().unwrap_or_default(),
        }
    }
}

fn detail(p: &IdentityProvider) -> String {
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Description", p.description.clone().unwrap_or_default()),
        ("Type", p.type_reference_name.clone().unwrap_or_default()),
        ("Login ID", p.rsts_provider_id.clone().unwrap_or_default()),
        ("Address", p.network_address.clone().unwrap_or_default()),
    ])
}

pub async fn handle(
    session: &Session,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list) => {
            let providers = session
                .client()
                .list_identity_providers(&util::list_filter(&list))
                .await?;
            let out = output::render_list(
                &global.output,
                &providers,
                |p| ProviderRow::from(p),
                // The login id is what `provider = ...` in a profile expects.
                |p| p.rsts_provider_id.clone().unwrap_or_else(|| p.id.to_string()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let provider = util::lookup(
                session.client().get_identity_provider(id, &[]).await,
                "identity provider",
                id,
                "providers list",
            )?;
            let out =
                output::render_single(&global.output, &provider, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
