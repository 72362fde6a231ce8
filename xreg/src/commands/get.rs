use std::path::Path;

use crate::error::{Error, Result};
use crate::util::format_value;

use super::open_registry;

pub fn run(registry: &Path, key: &str) -> Result<()> {
    let reg = open_registry(registry)?;

    let record = reg.find_key(key).ok_or_else(|| Error::KeyNotFound {
        key: key.to_string(),
    })?;
    let value = reg.find_value(record).ok_or_else(|| Error::ValueNotFound {
        key: key.to_string(),
    })?;

    println!("{}", format_value(value));
    Ok(())
}
