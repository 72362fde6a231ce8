use std::path::Path;

use serde::Serialize;
use xreg_format::{Registry, ValueRecord};

use crate::error::{Error, Result};
use crate::util::format_value;

use super::open_registry;

#[derive(Serialize)]
struct JsonEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    offset: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl JsonEntry {
    fn orphan(value: &ValueRecord) -> JsonEntry {
        JsonEntry {
            key: None,
            offset: format!("{:#x}", value.file_offset),
            value_type: Some(value.value_type.to_string()),
            slot: Some(value.length),
            value: Some(format_value(value)),
        }
    }
}

pub fn run(registry: &Path, json: bool, orphans: bool) -> Result<()> {
    let reg = open_registry(registry)?;

    if json {
        list_json(&reg, orphans)
    } else {
        list_table(&reg, orphans);
        Ok(())
    }
}

fn list_table(reg: &Registry, orphans: bool) {
    println!("{:>8}  {:<8}  {:>5}  {:<40}  Value", "Offset", "Type", "Slot", "Key");
    println!("{}", "-".repeat(80));

    for entry in reg.entries() {
        let offset = format!("{:#07x}", entry.key.file_offset);
        let name = entry.key.name_lossy();
        match entry.value {
            Some(value) => println!(
                "{:>8}  {:<8}  {:>5}  {:<40}  {}",
                offset,
                value.value_type.to_string(),
                value.length,
                name,
                format_value(value)
            ),
            None => println!("{:>8}  {:<8}  {:>5}  {:<40}  -", offset, "-", "-", name),
        }
    }

    if orphans {
        for value in reg.orphans() {
            println!(
                "{:>8}  {:<8}  {:>5}  {:<40}  {}",
                format!("{:#07x}", value.file_offset),
                value.value_type.to_string(),
                value.length,
                format!("<orphan:{:#x}>", value.owner_offset()),
                format_value(value)
            );
        }
    }
}

fn list_json(reg: &Registry, orphans: bool) -> Result<()> {
    let mut entries = reg
        .entries()
        .map(|entry| JsonEntry {
            key: Some(entry.key.name_lossy().into_owned()),
            offset: format!("{:#x}", entry.key.file_offset),
            value_type: entry.value.map(|v| v.value_type.to_string()),
            slot: entry.value.map(|v| v.length),
            value: entry.value.map(format_value),
        })
        .collect::<Vec<_>>();

    if orphans {
        entries.extend(reg.orphans().map(JsonEntry::orphan));
    }

    let out = serde_json::to_string_pretty(&entries).map_err(|source| Error::Json { source })?;
    println!("{}", out);
    Ok(())
}
