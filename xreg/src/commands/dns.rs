use std::path::Path;

use crate::dns::{validate_address, DnsMode, DnsSettings};
use crate::error::{Error, Result};

use super::{open_registry, save_registry};

fn print_settings(settings: &DnsSettings) {
    let show = |addr: &str| {
        if addr.is_empty() {
            "Automatic".to_string()
        } else {
            addr.to_string()
        }
    };

    println!("Mode:       {}", settings.mode);
    println!("Primary:    {}", show(&settings.primary));
    println!("Secondary:  {}", show(&settings.secondary));
}

pub fn show(registry: &Path, json: bool) -> Result<()> {
    let reg = open_registry(registry)?;
    let settings = DnsSettings::read(&reg)?;

    if json {
        let out =
            serde_json::to_string_pretty(&settings).map_err(|source| Error::Json { source })?;
        println!("{}", out);
    } else {
        print_settings(&settings);
    }

    Ok(())
}

pub fn set(
    registry: &Path,
    mode: Option<DnsMode>,
    primary: Option<String>,
    secondary: Option<String>,
) -> Result<()> {
    // Only addresses given on the command line are checked. Whatever the
    // registry already holds is written back as is.
    if let Some(addr) = primary.as_deref().filter(|a| !a.is_empty()) {
        validate_address("Primary", addr)?;
    }
    if let Some(addr) = secondary.as_deref().filter(|a| !a.is_empty()) {
        validate_address("Secondary", addr)?;
    }

    let mut reg = open_registry(registry)?;
    let current = DnsSettings::read(&reg)?;

    let settings = DnsSettings {
        mode: mode.unwrap_or(current.mode),
        primary: primary.unwrap_or_else(|| current.primary.clone()),
        secondary: secondary.unwrap_or_else(|| current.secondary.clone()),
    };

    if settings == current {
        tracing::info!("DNS settings unchanged");
        return Ok(());
    }

    apply(&mut reg, registry, &settings)
}

/// Writes `settings` into the registry and saves it once.
pub(crate) fn apply(
    reg: &mut xreg_format::Registry,
    registry: &Path,
    settings: &DnsSettings,
) -> Result<()> {
    settings.apply(reg)?;
    save_registry(reg, registry)?;
    print_settings(settings);
    Ok(())
}
