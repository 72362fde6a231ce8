//! Named DNS profiles kept in a CSV file with a `name,primary,secondary` header.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dns::{is_valid_address, DnsMode, DnsSettings};
use crate::error::{Error, Result};

pub const HEADER: [&str; 3] = ["name", "primary", "secondary"];

/// Maximum number of stored profiles.
pub const ROW_CAPACITY: usize = 20;

/// In bytes, not characters.
pub const NAME_MAX_LEN: usize = 19;

/// Profile names that always exist and cannot be stored.
pub const CURRENT_PROFILE: &str = "Current";
pub const SYSTEM_DEFAULT_PROFILE: &str = "System Default";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub primary: String,
    pub secondary: String,
}

impl Profile {
    pub fn new<N: Into<String>, P: Into<String>, S: Into<String>>(
        name: N,
        primary: P,
        secondary: S,
    ) -> Profile {
        Profile {
            name: name.into(),
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Stored profiles always select manual DNS.
    pub fn settings(&self) -> DnsSettings {
        DnsSettings {
            mode: DnsMode::Manual,
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

/// Reasons a new profile is refused, checked in declaration order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Stored profiles full, remove one first")]
    TooManyRows,

    #[error("Profile name must be between 1-{} chars", NAME_MAX_LEN)]
    NameLength,

    #[error("Profile name must be unique")]
    NameUniqueness,

    #[error("Profile name must not contain commas")]
    NameComma,

    #[error("Primary DNS address has incorrect length")]
    PrimaryLength,

    #[error("Primary DNS address is invalid")]
    PrimaryInvalid,

    #[error("Secondary DNS address has incorrect length")]
    SecondaryLength,

    #[error("Secondary DNS address is invalid")]
    SecondaryInvalid,
}

#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: Vec<Profile>,
}

impl ProfileStore {
    /// Reads all profiles from `path`, creating the file with only a header
    /// row when it is missing or empty. Rows with fewer than three fields are skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ProfileStore> {
        let path = path.as_ref().to_path_buf();

        let is_empty = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                return Err(Error::ReadProfiles {
                    path,
                    source: e.into(),
                })
            }
        };

        if is_empty {
            tracing::info!(path = %path.display(), "creating profiles file");
            write_rows(&path, &[csv::StringRecord::from(HEADER.to_vec())])?;
            return Ok(ProfileStore {
                path,
                profiles: vec![],
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(|source| Error::ReadProfiles {
                path: path.clone(),
                source,
            })?;

        let mut profiles = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| Error::ReadProfiles {
                path: path.clone(),
                source,
            })?;

            if record.len() < 3 {
                tracing::debug!(?record, "skipping short profile row");
                continue;
            }

            profiles.push(Profile::new(&record[0], &record[1], &record[2]));
        }

        tracing::debug!(path = %path.display(), count = profiles.len(), "loaded profiles");

        Ok(ProfileStore { path, profiles })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn validate(&self, profile: &Profile) -> std::result::Result<(), ProfileError> {
        if self.profiles.len() >= ROW_CAPACITY {
            return Err(ProfileError::TooManyRows);
        }

        if profile.name.is_empty() || profile.name.len() > NAME_MAX_LEN {
            return Err(ProfileError::NameLength);
        }

        let lower = profile.name.to_lowercase();
        let taken = [CURRENT_PROFILE, SYSTEM_DEFAULT_PROFILE]
            .iter()
            .map(|n| n.to_lowercase())
            .chain(self.profiles.iter().map(|p| p.name.to_lowercase()))
            .any(|n| n == lower);
        if taken {
            return Err(ProfileError::NameUniqueness);
        }

        if profile.name.contains(',') {
            return Err(ProfileError::NameComma);
        }

        if profile.primary.len() < 7 {
            return Err(ProfileError::PrimaryLength);
        }
        if !is_valid_address(&profile.primary) {
            return Err(ProfileError::PrimaryInvalid);
        }

        if profile.secondary.len() < 7 {
            return Err(ProfileError::SecondaryLength);
        }
        if !is_valid_address(&profile.secondary) {
            return Err(ProfileError::SecondaryInvalid);
        }

        Ok(())
    }

    /// Validates `profile` and appends it to the file.
    pub fn add(&mut self, profile: Profile) -> Result<()> {
        self.validate(&profile)
            .map_err(|source| Error::InvalidProfile {
                name: profile.name.clone(),
                source,
            })?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::WriteProfiles {
                path: self.path.clone(),
                source: e.into(),
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(&profile)
            .and_then(|_| writer.flush().map_err(Into::into))
            .map_err(|source| Error::WriteProfiles {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(name = %profile.name, "added profile");
        self.profiles.push(profile);
        Ok(())
    }

    /// Removes every row whose first field is exactly `name`, rewriting the
    /// file. Other rows are written back as read, including ones `open`
    /// skipped. Returns whether a row was removed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let read_err = |source: csv::Error| Error::ReadProfiles {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        let mut rows = Vec::new();
        let mut removed = false;
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(read_err)?;
            if index > 0 && record.get(0) == Some(name) {
                removed = true;
                continue;
            }
            rows.push(record);
        }

        if !removed {
            return Ok(false);
        }

        write_rows(&self.path, &rows)?;
        self.profiles.retain(|p| p.name != name);
        tracing::info!(name, "removed profile");
        Ok(true)
    }
}

/// Truncates `path` and writes `rows`, which may differ in length.
fn write_rows(path: &Path, rows: &[csv::StringRecord]) -> Result<()> {
    let err = |source: csv::Error| Error::WriteProfiles {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| err(e.into()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    for row in rows {
        writer.write_record(row).map_err(err)?;
    }
    writer.flush().map_err(|e| err(e.into()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ProfileStore::open(temp_dir.path().join("ezDNS.csv")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn open_creates_header() {
        let (_temp_dir, store) = store();
        assert!(store.profiles().is_empty());
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "name,primary,secondary\n");
    }

    #[test]
    fn add_and_reload() {
        let (_temp_dir, mut store) = store();
        store
            .add(Profile::new("Cloudflare", "1.1.1.1", "1.0.0.1"))
            .unwrap();
        store
            .add(Profile::new("Google", "8.8.8.8", "8.8.4.4"))
            .unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            text,
            "name,primary,secondary\nCloudflare,1.1.1.1,1.0.0.1\nGoogle,8.8.8.8,8.8.4.4\n"
        );

        let reloaded = ProfileStore::open(store.path()).unwrap();
        assert_eq!(reloaded.profiles(), store.profiles());
        assert_eq!(reloaded.get("Google").unwrap().primary, "8.8.8.8");
        assert!(reloaded.get("google").is_none());
    }

    #[test]
    fn short_rows_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ezDNS.csv");
        std::fs::write(
            &path,
            "name,primary,secondary\nbroken,1.1.1.1\nQuad9,9.9.9.9,149.112.112.112\n",
        )
        .unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.profiles()[0].name, "Quad9");
        assert_eq!(store.profiles()[0].settings().mode, DnsMode::Manual);
    }

    #[test]
    fn remove_keeps_header_and_other_rows() {
        let (_temp_dir, mut store) = store();
        store.add(Profile::new("A", "1.1.1.1", "1.0.0.1")).unwrap();
        store.add(Profile::new("B", "8.8.8.8", "8.8.4.4")).unwrap();

        assert!(store.remove("A").unwrap());
        assert!(!store.remove("A").unwrap());

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "name,primary,secondary\nB,8.8.8.8,8.8.4.4\n");
    }

    #[test]
    fn remove_keeps_rows_it_could_not_parse() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ezDNS.csv");
        std::fs::write(
            &path,
            "name,primary,secondary\nbroken,1.1.1.1\nA,1.1.1.1,1.0.0.1\nB,8.8.8.8,8.8.4.4,extra\n",
        )
        .unwrap();

        let mut store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.profiles().len(), 2);
        assert!(store.remove("A").unwrap());
        assert_eq!(store.profiles().len(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "name,primary,secondary\nbroken,1.1.1.1\nB,8.8.8.8,8.8.4.4,extra\n"
        );
    }

    #[test]
    fn name_length_counts_bytes() {
        let (_temp_dir, store) = store();
        let wide = "\u{e9}".repeat(10);
        assert_eq!(wide.chars().count(), 10);
        assert_eq!(
            store
                .validate(&Profile::new(wide, "1.1.1.1", "1.0.0.1"))
                .unwrap_err(),
            ProfileError::NameLength
        );
        assert!(store
            .validate(&Profile::new("a".repeat(NAME_MAX_LEN), "1.1.1.1", "1.0.0.1"))
            .is_ok());
    }

    #[test]
    fn validation_order() {
        let (_temp_dir, mut store) = store();
        store.add(Profile::new("Home", "1.1.1.1", "1.0.0.1")).unwrap();

        let check = |p: Profile| store.validate(&p).unwrap_err();
        assert_eq!(check(Profile::new("", "", "")), ProfileError::NameLength);
        assert_eq!(
            check(Profile::new("a-very-long-profile-name", "", "")),
            ProfileError::NameLength
        );
        assert_eq!(check(Profile::new("HOME", "", "")), ProfileError::NameUniqueness);
        assert_eq!(
            check(Profile::new("system default", "", "")),
            ProfileError::NameUniqueness
        );
        assert_eq!(check(Profile::new("a,b", "", "")), ProfileError::NameComma);
        assert_eq!(check(Profile::new("x", "1.1.1", "")), ProfileError::PrimaryLength);
        assert_eq!(
            check(Profile::new("x", "1.1.1.1.1", "")),
            ProfileError::PrimaryInvalid
        );
        assert_eq!(
            check(Profile::new("x", "1.1.1.1", "")),
            ProfileError::SecondaryLength
        );
        assert_eq!(
            check(Profile::new("x", "1.1.1.1", "1.0.0.300")),
            ProfileError::SecondaryInvalid
        );
    }

    #[test]
    fn capacity_is_enforced() {
        let (_temp_dir, mut store) = store();
        for i in 0..ROW_CAPACITY {
            store
                .add(Profile::new(format!("p{}", i), "1.1.1.1", "1.0.0.1"))
                .unwrap();
        }

        let err = store
            .add(Profile::new("extra", "1.1.1.1", "1.0.0.1"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidProfile {
                source: ProfileError::TooManyRows,
                ..
            }
        ));
    }
}
