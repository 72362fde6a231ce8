use std::path::Path;

use xreg_format::ValueType;

use crate::error::{Error, Result};

use super::{open_registry, save_registry};

/// Encodes a command line value as the payload for a slot of `ty`.
pub(crate) fn encode_value(ty: ValueType, value: &str) -> Result<Vec<u8>> {
    let parse_err = || Error::ParseValue {
        value: value.to_string(),
        ty,
    };

    let payload = match ty {
        ValueType::Bool => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => vec![1],
            "false" | "0" | "off" => vec![0],
            _ => return Err(parse_err()),
        },
        ValueType::Integer => value
            .parse::<i32>()
            .map_err(|_| parse_err())?
            .to_be_bytes()
            .to_vec(),
        ValueType::String => value.as_bytes().to_vec(),
        ValueType::Unknown(_) => return Err(parse_err()),
    };

    Ok(payload)
}

pub fn run(registry: &Path, value_type: ValueType, key: &str, value: &str) -> Result<()> {
    let mut reg = open_registry(registry)?;
    let payload = encode_value(value_type, value)?;

    reg.update_value(key, value_type, &payload)
        .map_err(|source| Error::UpdateValue {
            key: key.to_string(),
            source,
        })?;

    save_registry(&reg, registry)
}
