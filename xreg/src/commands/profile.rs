use std::path::Path;

use crate::dns::{DnsMode, DnsSettings};
use crate::error::{Error, Result};
use crate::profiles::{Profile, ProfileStore, SYSTEM_DEFAULT_PROFILE};

use super::open_registry;

pub fn list(profiles: &Path, registry: &Path) -> Result<()> {
    let store = ProfileStore::open(profiles)?;

    // Mark addresses that match the registry, when it can be read.
    let current = match open_registry(registry).and_then(|reg| DnsSettings::read(&reg)) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::debug!(error = %e, "not comparing against current settings");
            None
        }
    };

    let mark = |addr: &str, current: Option<&str>| {
        if current == Some(addr) {
            format!("{}*", addr)
        } else {
            addr.to_string()
        }
    };

    println!("{:<20}  {:<16}  {:<16}", "Name", "Primary", "Secondary");
    println!("{}", "-".repeat(56));
    println!(
        "{:<20}  {:<16}  {:<16}",
        SYSTEM_DEFAULT_PROFILE, "Automatic", "Automatic"
    );

    for profile in store.profiles() {
        println!(
            "{:<20}  {:<16}  {:<16}",
            profile.name,
            mark(
                &profile.primary,
                current.as_ref().map(|c| c.primary.as_str())
            ),
            mark(
                &profile.secondary,
                current.as_ref().map(|c| c.secondary.as_str())
            ),
        );
    }

    Ok(())
}

pub fn add(profiles: &Path, name: String, primary: String, secondary: String) -> Result<()> {
    let mut store = ProfileStore::open(profiles)?;
    store.add(Profile::new(name, primary, secondary))
}

pub fn remove(profiles: &Path, name: &str) -> Result<()> {
    let mut store = ProfileStore::open(profiles)?;
    if store.remove(name)? {
        Ok(())
    } else {
        Err(Error::ProfileNotFound {
            name: name.to_string(),
        })
    }
}

/// Applies a stored profile, or automatic DNS for the system default.
pub fn apply(profiles: &Path, registry: &Path, name: &str) -> Result<()> {
    let settings = if name.eq_ignore_ascii_case(SYSTEM_DEFAULT_PROFILE) {
        DnsSettings {
            mode: DnsMode::Automatic,
            primary: String::new(),
            secondary: String::new(),
        }
    } else {
        let store = ProfileStore::open(profiles)?;
        store
            .get(name)
            .map(Profile::settings)
            .ok_or_else(|| Error::ProfileNotFound {
                name: name.to_string(),
            })?
    };

    // Rows edited by hand are not checked when the file is read.
    settings.validate()?;

    let mut reg = open_registry(registry)?;
    super::dns::apply(&mut reg, registry, &settings)
}
