//! Account source adapters: read inventory files, or generate a synthetic directory.
//!
//! This crate is allowed to do filesystem IO and owns all randomness. The domain crate
//! only ever sees a materialized [`Population`].

#![forbid(unsafe_code)]

mod inventory;
mod synthetic;

use mfaguard_domain::model::{AccountKind, Population};

pub use inventory::{InventoryFile, InventoryFormat, parse_inventory_json, parse_inventory_toml};
pub use synthetic::SyntheticDirectory;

/// Something that can produce the account population for one check run.
pub trait AccountSource {
    fn load(&self) -> anyhow::Result<Population>;

    /// Short human-readable label recorded in the report's run metadata.
    fn describe(&self) -> String;
}

/// Identifier prefixes of service accounts, shared with the synthetic generator.
pub(crate) const SERVICE_PREFIXES: &[&str] = &["svc_", "service", "sql", "app"];

/// Guess the account kind from directory naming conventions.
///
/// `admin*` is an admin; `svc_*`, `service*`, `sql*` and `app*` are service accounts;
/// everything else is a regular user.
pub fn infer_kind(identifier: &str) -> AccountKind {
    if identifier.starts_with("admin") {
        AccountKind::Admin
    } else if SERVICE_PREFIXES.iter().any(|p| identifier.starts_with(p)) {
        AccountKind::Service
    } else {
        AccountKind::User
    }
}
