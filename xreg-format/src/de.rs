//! Tolerant record scanning over the keys and values regions.
//!
//! A region ends at its end marker, at the region boundary, or at the first
//! record that does not fit before the boundary. None of these are errors:
//! every record decoded up to that point is kept.

use std::io::{Error, ErrorKind, Result};

use byteorder::{BigEndian, ReadBytesExt};

use crate::layout::{Region, END_MARKER, KEY_HEADER_LEN, TERMINATOR_LEN, VALUE_HEADER_LEN};
use crate::record::{KeyRecord, ValueRecord, ValueType};

pub(crate) trait DeserializeOwned: Sized {
    /// Decodes the record whose header starts at `data[pos]`, returning it
    /// with the number of bytes it occupies. `data` ends at the region boundary.
    fn deserialize_owned(data: &[u8], pos: usize) -> Result<(Self, usize)>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Stop {
    EndMarker,
    Boundary,
    Truncated,
}

/// Reads `length` payload bytes and skips the terminator that follows them.
fn read_payload(reader: &mut &[u8], length: u16) -> Result<Vec<u8>> {
    let length = length as usize;
    if reader.len() < length + TERMINATOR_LEN {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            format!(
                "payload of {} bytes needs {} more bytes than remain in region",
                length,
                length + TERMINATOR_LEN - reader.len()
            ),
        ));
    }
    let payload = reader[..length].to_vec();
    *reader = &reader[length + TERMINATOR_LEN..];
    Ok(payload)
}

impl DeserializeOwned for KeyRecord {
    fn deserialize_owned(data: &[u8], pos: usize) -> Result<(Self, usize)> {
        let mut reader = &data[pos..];
        let tag = reader.read_u16::<BigEndian>()?;
        let length = reader.read_u16::<BigEndian>()?;
        let key_type = reader.read_u8()?;
        let name = read_payload(&mut reader, length)?;

        let bytes = KEY_HEADER_LEN + length as usize + TERMINATOR_LEN;
        tracing::debug!(
            start = format_args!("{:#x}", pos),
            end = format_args!("{:#x}", pos + bytes),
            bytes,
            name = %String::from_utf8_lossy(&name),
            "deserialized KeyRecord"
        );

        Ok((
            KeyRecord {
                file_offset: pos as u32,
                tag,
                length,
                key_type,
                name,
            },
            bytes,
        ))
    }
}

impl DeserializeOwned for ValueRecord {
    fn deserialize_owned(data: &[u8], pos: usize) -> Result<(Self, usize)> {
        let mut reader = &data[pos..];
        let tag1 = reader.read_u16::<BigEndian>()?;
        let key_offset = reader.read_u16::<BigEndian>()?;
        let tag2 = reader.read_u16::<BigEndian>()?;
        let length = reader.read_u16::<BigEndian>()?;
        let value_type = ValueType::from_id(reader.read_u8()?);
        let payload = read_payload(&mut reader, length)?;

        let bytes = VALUE_HEADER_LEN + length as usize + TERMINATOR_LEN;
        tracing::debug!(
            start = format_args!("{:#x}", pos),
            end = format_args!("{:#x}", pos + bytes),
            bytes,
            key_offset = format_args!("{:#x}", key_offset),
            %value_type,
            "deserialized ValueRecord"
        );

        Ok((
            ValueRecord {
                file_offset: pos as u32,
                tag1,
                key_offset,
                tag2,
                length,
                value_type,
                data: payload,
            },
            bytes,
        ))
    }
}

/// Scans `region` of `buf` for records of type `T`.
pub(crate) fn parse_region<T: DeserializeOwned>(buf: &[u8], region: Region) -> Vec<T> {
    let end = region.end_within(buf.len());
    let data = &buf[..end];
    let mut pos = region.start;
    let mut records = Vec::new();

    let stop = loop {
        if pos + 1 >= end {
            break Stop::Boundary;
        }

        if data[pos..].starts_with(END_MARKER) {
            break Stop::EndMarker;
        }

        match T::deserialize_owned(data, pos) {
            Ok((record, bytes)) => {
                records.push(record);
                pos += bytes;
            }
            Err(e) => {
                tracing::debug!(
                    region = region.name,
                    at = format_args!("{:#x}", pos),
                    error = %e,
                    "record runs past region end"
                );
                break Stop::Truncated;
            }
        }
    };

    tracing::debug!(
        region = region.name,
        start = format_args!("{:#x}", region.start),
        end = format_args!("{:#x}", pos),
        count = records.len(),
        ?stop,
        "scanned region"
    );

    records
}

#[inline(always)]
pub(crate) fn parse_keys(buf: &[u8]) -> Vec<KeyRecord> {
    parse_region(buf, Region::KEYS)
}

#[inline(always)]
pub(crate) fn parse_values(buf: &[u8]) -> Vec<ValueRecord> {
    parse_region(buf, Region::VALUES)
}
