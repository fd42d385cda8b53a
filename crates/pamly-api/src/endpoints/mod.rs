// Per-resource endpoints, as inherent methods on `ApplianceClient`.

mod access_requests;
mod accounts;
mod assets;
mod cluster;
mod identity_providers;
mod me;
mod policies;
mod roles;
mod users;

/// Query pairs for a single-record GET restricted to `fields`.
pub(crate) fn fields_query(fields: &[&str]) -> Vec<(&'static str, String)> {
    if fields.is_empty() {
        Vec::new()
    } else {
        vec![("fields", fields.join(","))]
    }
}
