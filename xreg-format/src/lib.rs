mod de;
mod error;
pub mod layout;
mod record;
mod registry;

pub use error::{OpenError, UpdateError};
pub use record::{constants, KeyRecord, ValueRecord, ValueType};
pub use registry::{Entry, Registry};

use std::path::Path;

/// Loads and parses the registry file at `path`.
#[inline(always)]
pub fn load<P: AsRef<Path>>(path: P) -> Result<Registry, OpenError> {
    Registry::open(path)
}
