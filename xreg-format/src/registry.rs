use std::fs::OpenOptions;
use std::io::{prelude::*, ErrorKind};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

use crate::{
    de::{parse_keys, parse_values},
    error::{OpenError, UpdateError},
    record::{fill_slot, KeyRecord, ValueRecord, ValueType},
};

/// An `xRegistry.sys` file held in memory.
///
/// The raw buffer and the decoded records are owned separately. Updates write
/// through to both, and never change the size of the buffer or the position
/// of any record in it.
#[derive(Debug)]
pub struct Registry {
    pub(crate) buffer: Vec<u8>,
    pub(crate) keys: Vec<KeyRecord>,
    pub(crate) values: Vec<ValueRecord>,
}

/// A key record paired with the value that resolves to it, if any.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub key: &'a KeyRecord,
    pub value: Option<&'a ValueRecord>,
}

impl Registry {
    /// Reads the whole file at `path` and parses both regions.
    ///
    /// Only a missing, unreadable or empty file is an error. A damaged region
    /// yields the records that precede the damage.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Registry, OpenError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().read(true).open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                OpenError::NotFound(e, path.to_path_buf())
            } else {
                OpenError::ReadFailed(e, path.to_path_buf())
            }
        })?;

        let size = file
            .metadata()
            .map_err(|e| OpenError::ReadFailed(e, path.to_path_buf()))?
            .len();
        if size == 0 {
            return Err(OpenError::Empty(path.to_path_buf()));
        }

        let mut buffer = Vec::with_capacity(size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| OpenError::ReadFailed(e, path.to_path_buf()))?;

        tracing::debug!(path = %path.display(), bytes = buffer.len(), "read registry file");

        Registry::from_bytes(buffer).map_err(|_| OpenError::Empty(path.to_path_buf()))
    }

    /// Parses a registry image that is already in memory.
    pub fn from_bytes(buffer: Vec<u8>) -> Result<Registry, OpenError> {
        if buffer.is_empty() {
            return Err(OpenError::Empty(Default::default()));
        }

        let keys = parse_keys(&buffer);
        let values = parse_values(&buffer);

        tracing::debug!(
            bytes = buffer.len(),
            keys = keys.len(),
            values = values.len(),
            "parsed registry"
        );

        Ok(Registry {
            buffer,
            keys,
            values,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    #[inline(always)]
    pub fn keys(&self) -> &[KeyRecord] {
        &self.keys
    }

    #[inline(always)]
    pub fn values(&self) -> &[ValueRecord] {
        &self.values
    }

    /// First key whose name is byte-for-byte equal to `name`.
    pub fn find_key<N: AsRef<[u8]>>(&self, name: N) -> Option<&KeyRecord> {
        let name = name.as_ref();
        self.keys.iter().find(|k| k.name() == name)
    }

    /// First value whose key offset resolves to `key`.
    pub fn find_value(&self, key: &KeyRecord) -> Option<&ValueRecord> {
        self.values.iter().find(|v| v.is_owned_by(key))
    }

    /// First key that `value` resolves to. `None` for an orphan value.
    pub fn find_key_for_value(&self, value: &ValueRecord) -> Option<&KeyRecord> {
        self.keys.iter().find(|k| value.is_owned_by(k))
    }

    /// Looks up a key by name and resolves its value.
    pub fn get<N: AsRef<[u8]>>(&self, name: N) -> Option<&ValueRecord> {
        self.find_key(name).and_then(|k| self.find_value(k))
    }

    /// Keys in file order, each with its resolved value.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.keys.iter().map(move |key| Entry {
            key,
            value: self.find_value(key),
        })
    }

    /// Values that no key resolves to.
    pub fn orphans(&self) -> impl Iterator<Item = &ValueRecord> + '_ {
        self.values
            .iter()
            .filter(move |v| self.find_key_for_value(v).is_none())
    }

    /// Overwrites the payload of the value belonging to `key_name`.
    ///
    /// The stored type must equal `expected_type` and `payload` must fit the
    /// slot. A shorter payload is zero filled to the slot length. On any error
    /// nothing is written.
    pub fn update_value<N: AsRef<[u8]>>(
        &mut self,
        key_name: N,
        expected_type: ValueType,
        payload: &[u8],
    ) -> Result<(), UpdateError> {
        let name = key_name.as_ref();
        let display_name = || String::from_utf8_lossy(name).into_owned();

        let owner = self
            .find_key(name)
            .map(|k| k.file_offset)
            .ok_or_else(|| UpdateError::KeyNotFound(display_name()))?;

        let index = self
            .values
            .iter()
            .position(|v| v.owner_offset() == owner)
            .ok_or_else(|| UpdateError::ValueNotFound(display_name()))?;

        let value = &self.values[index];

        if value.value_type != expected_type {
            return Err(UpdateError::TypeMismatch {
                key: display_name(),
                expected: expected_type,
                found: value.value_type,
            });
        }

        if payload.len() > value.slot_len() {
            return Err(UpdateError::PayloadTooLarge {
                key: display_name(),
                len: payload.len(),
                capacity: value.slot_len(),
            });
        }

        let start = value.payload_offset();
        let end = start + value.slot_len();

        fill_slot(&mut self.buffer[start..end], payload);
        self.values[index].fill(payload);

        tracing::debug!(
            key = %display_name(),
            at = format_args!("{:#x}", start),
            bytes = payload.len(),
            padding = end - start - payload.len(),
            "updated value"
        );

        Ok(())
    }

    pub fn set_bool<N: AsRef<[u8]>>(&mut self, key_name: N, value: bool) -> Result<(), UpdateError> {
        self.update_value(key_name, ValueType::Bool, &[value as u8])
    }

    /// Stores `value` as a 4 byte big-endian integer.
    pub fn set_int<N: AsRef<[u8]>>(&mut self, key_name: N, value: i32) -> Result<(), UpdateError> {
        let mut buf = [0u8; 4];
        BigEndian::write_i32(&mut buf, value);
        self.update_value(key_name, ValueType::Integer, &buf)
    }

    pub fn set_string<N: AsRef<[u8]>, S: AsRef<[u8]>>(
        &mut self,
        key_name: N,
        value: S,
    ) -> Result<(), UpdateError> {
        self.update_value(key_name, ValueType::String, value.as_ref())
    }

    /// Writes the whole buffer to `path`, replacing any existing file.
    ///
    /// The write is not atomic. A crash part way through leaves a damaged file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;

        file.write_all(&self.buffer)?;
        file.flush()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            bytes = self.buffer.len(),
            "saved registry file"
        );

        Ok(())
    }
}
