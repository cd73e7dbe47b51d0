use crate::{AccountSource, infer_kind};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use mfaguard_domain::model::{Account, AccountKind, Population};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryFormat {
    Json,
    Toml,
}

impl InventoryFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => InventoryFormat::Toml,
            _ => InventoryFormat::Json,
        }
    }
}

/// An account inventory exported from a directory service.
#[derive(Clone, Debug)]
pub struct InventoryFile {
    pub path: Utf8PathBuf,
    pub format: InventoryFormat,
}

impl InventoryFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let format = InventoryFormat::from_path(&path);
        Self { path, format }
    }
}

impl AccountSource for InventoryFile {
    fn load(&self) -> anyhow::Result<Population> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read inventory {}", self.path))?;
        let population = match self.format {
            InventoryFormat::Json => parse_inventory_json(&text),
            InventoryFormat::Toml => parse_inventory_toml(&text),
        }
        .with_context(|| format!("parse inventory {}", self.path))?;
        tracing::debug!(path = %self.path, accounts = population.len(), "loaded inventory");
        Ok(population)
    }

    fn describe(&self) -> String {
        format!("inventory:{}", self.path)
    }
}

/// Parse a JSON inventory.
///
/// Accepted shapes:
/// - `{"accounts": [{"id": "alice", "kind": "user", "mfa_enabled": true}, ...]}`
/// - a bare array of the same entries
/// - a flag map `{"alice": true, "bob": false}` (document order is kept, and a repeated
///   key yields a repeated account so the evaluator can reject it)
pub fn parse_inventory_json(text: &str) -> anyhow::Result<Population> {
    let doc: Value = serde_json::from_str(text).context("invalid JSON")?;
    match doc {
        Value::Array(entries) => parse_entries(&entries),
        Value::Object(map) => match map.get("accounts") {
            Some(Value::Array(entries)) => parse_entries(entries),
            Some(_) => anyhow::bail!("`accounts` must be an array"),
            None => parse_flag_map(text),
        },
        _ => anyhow::bail!("inventory must be an object or an array"),
    }
}

/// Parse a TOML inventory made of `[[accounts]]` tables.
pub fn parse_inventory_toml(text: &str) -> anyhow::Result<Population> {
    let table: toml::Table = toml::from_str(text).context("invalid TOML")?;
    let Some(accounts) = table.get("accounts") else {
        anyhow::bail!("missing [[accounts]] tables");
    };
    let entries = serde_json::to_value(accounts).context("convert TOML accounts")?;
    match entries {
        Value::Array(entries) => parse_entries(&entries),
        _ => anyhow::bail!("`accounts` must be an array of tables"),
    }
}

fn parse_flag_map(text: &str) -> anyhow::Result<Population> {
    let FlagMap(entries) = serde_json::from_str(text).context("invalid flag map")?;
    let accounts = entries
        .into_iter()
        .map(|(id, mfa)| {
            let kind = infer_kind(&id);
            Account::new(id, kind).with_attribute(mfaguard_types::ids::ATTR_MFA_ENABLED, mfa)
        })
        .collect();
    Ok(Population::new(accounts))
}

/// `{"id": bool, ...}` read entry by entry; unlike a JSON object value, repeated keys
/// are all kept.
struct FlagMap(Vec<(String, bool)>);

impl<'de> Deserialize<'de> for FlagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FlagMapVisitor)
    }
}

struct FlagMapVisitor;

impl<'de> Visitor<'de> for FlagMapVisitor {
    type Value = FlagMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of account identifiers to booleans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FlagMap, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((id, value)) = map.next_entry::<String, Value>()? {
            let mfa = value.as_bool().ok_or_else(|| {
                de::Error::custom(format!("flag for account {id:?} must be a boolean"))
            })?;
            entries.push((id, mfa));
        }
        Ok(FlagMap(entries))
    }
}

fn parse_entries(entries: &[Value]) -> anyhow::Result<Population> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(entry).with_context(|| format!("account #{i}")))
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Population::new)
}

fn parse_entry(entry: &Value) -> anyhow::Result<Account> {
    let Some(obj) = entry.as_object() else {
        anyhow::bail!("account entry must be an object");
    };

    let id = ["id", "identifier", "name"]
        .iter()
        .find_map(|k| obj.get(*k))
        .context("missing `id`")?
        .as_str()
        .context("`id` must be a string")?;

    let kind = match obj.get("kind") {
        None => infer_kind(id),
        Some(v) => parse_kind(v.as_str().context("`kind` must be a string")?)?,
    };

    let mut account = Account::new(id, kind);
    for (key, value) in obj {
        if matches!(key.as_str(), "id" | "identifier" | "name" | "kind") {
            continue;
        }
        match value.as_bool() {
            Some(b) => account = account.with_attribute(key.as_str(), b),
            None => tracing::debug!(account = id, field = %key, "ignoring non-boolean field"),
        }
    }
    Ok(account)
}

fn parse_kind(v: &str) -> anyhow::Result<AccountKind> {
    match v {
        "admin" => Ok(AccountKind::Admin),
        "service" => Ok(AccountKind::Service),
        "user" => Ok(AccountKind::User),
        other => anyhow::bail!("unknown account kind: {other} (expected admin|service|user)"),
    }
}
