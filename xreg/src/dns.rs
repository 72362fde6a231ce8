//! Network DNS settings stored under three well-known registry keys.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Serialize;
use xreg_format::{Registry, ValueType};

use crate::error::{Error, Result};
use crate::util::sanitize;

pub const DNS_FLAG_KEY: &str = "/setting/net/dnsFlag";
pub const DNS_PRIMARY_KEY: &str = "/setting/net/primaryDns";
pub const DNS_SECONDARY_KEY: &str = "/setting/net/secondaryDns";

const DNS_FLAG_AUTOMATIC: i32 = 0;
const DNS_FLAG_MANUAL: i32 = 1;

/// Shortest and longest dotted-quad address.
const ADDRESS_MIN_LEN: usize = 7;
const ADDRESS_MAX_LEN: usize = 15;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsMode {
    Automatic,
    Manual,
}

impl DnsMode {
    /// Any flag other than manual is treated as automatic.
    pub fn from_flag(flag: i32) -> DnsMode {
        match flag {
            DNS_FLAG_MANUAL => DnsMode::Manual,
            _ => DnsMode::Automatic,
        }
    }

    pub fn flag(self) -> i32 {
        match self {
            DnsMode::Automatic => DNS_FLAG_AUTOMATIC,
            DnsMode::Manual => DNS_FLAG_MANUAL,
        }
    }
}

impl fmt::Display for DnsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsMode::Automatic => write!(f, "Automatic"),
            DnsMode::Manual => write!(f, "Manual"),
        }
    }
}

#[derive(Debug)]
pub struct ParseDnsModeError(String);

impl std::error::Error for ParseDnsModeError {}

impl fmt::Display for ParseDnsModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown DNS mode: {}", self.0)
    }
}

impl FromStr for DnsMode {
    type Err = ParseDnsModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "automatic" => Ok(DnsMode::Automatic),
            "manual" => Ok(DnsMode::Manual),
            _ => Err(ParseDnsModeError(s.to_string())),
        }
    }
}

/// The DNS mode and both server addresses. An empty address is unset.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DnsSettings {
    pub mode: DnsMode,
    pub primary: String,
    pub secondary: String,
}

impl DnsSettings {
    pub fn read(reg: &Registry) -> Result<DnsSettings> {
        Ok(DnsSettings {
            mode: DnsMode::from_flag(read_int(reg, DNS_FLAG_KEY)?),
            primary: read_string(reg, DNS_PRIMARY_KEY)?,
            secondary: read_string(reg, DNS_SECONDARY_KEY)?,
        })
    }

    /// Writes all three values into `reg`. Nothing is saved to disk.
    pub fn apply(&self, reg: &mut Registry) -> Result<()> {
        update(reg, DNS_FLAG_KEY, |reg| reg.set_int(DNS_FLAG_KEY, self.mode.flag()))?;
        update(reg, DNS_PRIMARY_KEY, |reg| {
            reg.set_string(DNS_PRIMARY_KEY, &self.primary)
        })?;
        update(reg, DNS_SECONDARY_KEY, |reg| {
            reg.set_string(DNS_SECONDARY_KEY, &self.secondary)
        })?;

        tracing::info!(
            mode = %self.mode,
            primary = %self.primary,
            secondary = %self.secondary,
            "applied DNS settings"
        );
        Ok(())
    }

    /// Non-empty addresses must be valid. The registry layer accepts any
    /// bytes that fit, so this is the only place addresses are checked.
    pub fn validate(&self) -> Result<()> {
        if !self.primary.is_empty() {
            validate_address("Primary", &self.primary)?;
        }
        if !self.secondary.is_empty() {
            validate_address("Secondary", &self.secondary)?;
        }
        Ok(())
    }
}

fn update<F>(reg: &mut Registry, key: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut Registry) -> std::result::Result<(), xreg_format::UpdateError>,
{
    f(reg).map_err(|source| Error::UpdateValue {
        key: key.to_string(),
        source,
    })
}

pub fn is_valid_address(value: &str) -> bool {
    (ADDRESS_MIN_LEN..=ADDRESS_MAX_LEN).contains(&value.len()) && value.parse::<Ipv4Addr>().is_ok()
}

pub fn validate_address(field: &'static str, value: &str) -> Result<()> {
    if is_valid_address(value) {
        Ok(())
    } else {
        tracing::debug!(field, value, "IP address invalid");
        Err(Error::InvalidAddress {
            field,
            value: value.to_string(),
        })
    }
}

/// Reads a 4 byte integer value.
pub fn read_int(reg: &Registry, key: &str) -> Result<i32> {
    let value = lookup(reg, key)?;
    value.as_int().ok_or_else(|| Error::UnexpectedType {
        key: key.to_string(),
        expected: ValueType::Integer,
        found: value.value_type,
    })
}

/// Reads a string value up to its first NUL, with unprintable bytes replaced.
pub fn read_string(reg: &Registry, key: &str) -> Result<String> {
    let value = lookup(reg, key)?;
    value
        .as_text()
        .map(sanitize)
        .ok_or_else(|| Error::UnexpectedType {
            key: key.to_string(),
            expected: ValueType::String,
            found: value.value_type,
        })
}

fn lookup<'a>(reg: &'a Registry, key: &str) -> Result<&'a xreg_format::ValueRecord> {
    let record = reg.find_key(key).ok_or_else(|| Error::KeyNotFound {
        key: key.to_string(),
    })?;
    reg.find_value(record).ok_or_else(|| Error::ValueNotFound {
        key: key.to_string(),
    })
}
