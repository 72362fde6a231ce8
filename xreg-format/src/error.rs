use std::path::PathBuf;

use crate::record::ValueType;

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Registry file not found. Path: '{}'", .1.display())]
    NotFound(#[source] std::io::Error, PathBuf),

    #[error("Registry file is empty. Path: '{}'", .0.display())]
    Empty(PathBuf),

    #[error("Failed to read registry file. Path: '{}'", .1.display())]
    ReadFailed(#[source] std::io::Error, PathBuf),
}

/// Reasons an in-place value update was refused. The registry is left
/// untouched in every case.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum UpdateError {
    #[error("Key not found in registry. Key: '{0}'")]
    KeyNotFound(String),

    #[error("Key has no value in registry. Key: '{0}'")]
    ValueNotFound(String),

    #[error("Value has type {found}, expected {expected}. Key: '{key}'")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Payload of {len} bytes does not fit slot of {capacity} bytes. Key: '{key}'")]
    PayloadTooLarge {
        key: String,
        len: usize,
        capacity: usize,
    },
}
