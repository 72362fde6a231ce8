use std::path::Path;

use xreg_format::Registry;

use crate::error::{Error, Result};

pub mod dns;
pub mod get;
pub mod list;
pub mod profile;
pub mod set;

pub use get::run as get;
pub use list::run as list;
pub use set::run as set;

pub(crate) fn open_registry(path: &Path) -> Result<Registry> {
    Registry::open(path).map_err(|source| Error::OpenRegistry {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn save_registry(reg: &Registry, path: &Path) -> Result<()> {
    reg.save(path).map_err(|source| Error::SaveRegistry {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "saved registry");
    Ok(())
}
