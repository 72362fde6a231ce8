use std::path::PathBuf;

use xreg_format::{OpenError, UpdateError, ValueType};

use crate::profiles::ProfileError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open registry `{}`", .path.display())]
    OpenRegistry {
        path: PathBuf,
        #[source]
        source: OpenError,
    },

    #[error("Cannot save registry `{}`", .path.display())]
    SaveRegistry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot update value `{key}`")]
    UpdateValue {
        key: String,
        #[source]
        source: UpdateError,
    },

    #[error("Key not found in registry: `{key}`")]
    KeyNotFound { key: String },

    #[error("Key has no value in registry: `{key}`")]
    ValueNotFound { key: String },

    #[error("Value of `{key}` is not a valid {expected} (found {found})")]
    UnexpectedType {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Cannot parse `{value}` as {ty}")]
    ParseValue { value: String, ty: ValueType },

    #[error("{field} DNS address `{value}` is invalid")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Cannot read profiles `{}`", .path.display())]
    ReadProfiles {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot write profiles `{}`", .path.display())]
    WriteProfiles {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot add profile `{name}`")]
    InvalidProfile {
        name: String,
        #[source]
        source: ProfileError,
    },

    #[error("Profile not found: `{name}`")]
    ProfileNotFound { name: String },

    #[error("Cannot serialize output")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}
