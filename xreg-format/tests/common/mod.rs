//! Builds registry images for tests.

#![allow(dead_code)]

use std::collections::HashMap;

use byteorder::{BigEndian, WriteBytesExt};
use xreg_format::layout::{
    END_MARKER, KEYS_HEADER_SIZE, KEYS_REGION_OFFSET, REGION_SIZE, VALUES_REGION_OFFSET,
};

/// Size of registry files written by the console.
pub const FILE_SIZE: usize = 0x40000;

pub const PRIMARY_DNS: &str = "/setting/net/primaryDns";
pub const SECONDARY_DNS: &str = "/setting/net/secondaryDns";
pub const DNS_FLAG: &str = "/setting/net/dnsFlag";

enum Owner {
    Key(String),
    Offset(u16),
}

struct Value {
    owner: Owner,
    ty: u8,
    slot: Vec<u8>,
}

#[derive(Default)]
pub struct ImageBuilder {
    keys: Vec<(String, u8)>,
    values: Vec<Value>,
    hidden_keys: Vec<String>,
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        ImageBuilder::default()
    }

    pub fn key(mut self, name: &str, ty: u8) -> Self {
        self.keys.push((name.to_string(), ty));
        self
    }

    /// A key written after the keys region end marker.
    pub fn hidden_key(mut self, name: &str) -> Self {
        self.hidden_keys.push(name.to_string());
        self
    }

    /// Adds a value owned by the key named `key`, with a slot holding `slot`.
    pub fn value(mut self, key: &str, ty: u8, slot: &[u8]) -> Self {
        self.values.push(Value {
            owner: Owner::Key(key.to_string()),
            ty,
            slot: slot.to_vec(),
        });
        self
    }

    pub fn orphan(mut self, key_offset: u16, ty: u8, slot: &[u8]) -> Self {
        self.values.push(Value {
            owner: Owner::Offset(key_offset),
            ty,
            slot: slot.to_vec(),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8; FILE_SIZE];
        for (i, b) in buf[KEYS_REGION_OFFSET..KEYS_HEADER_SIZE].iter_mut().enumerate() {
            *b = 0x80 | i as u8;
        }
        for (i, b) in buf[VALUES_REGION_OFFSET + REGION_SIZE..].iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }

        let mut offsets = HashMap::new();
        let mut keys = Vec::new();
        for (i, (name, ty)) in self.keys.iter().enumerate() {
            offsets.insert(name.clone(), KEYS_HEADER_SIZE + keys.len());
            write_key(&mut keys, i as u16, *ty, name.as_bytes());
        }
        keys.extend_from_slice(END_MARKER);
        for name in self.hidden_keys.iter() {
            write_key(&mut keys, 0xffff, 2, name.as_bytes());
        }
        let start = KEYS_REGION_OFFSET + KEYS_HEADER_SIZE;
        buf[start..start + keys.len()].copy_from_slice(&keys);

        let mut values = Vec::new();
        for (i, value) in self.values.iter().enumerate() {
            let key_offset = match &value.owner {
                Owner::Key(name) => (offsets[name] - KEYS_HEADER_SIZE) as u16,
                Owner::Offset(offset) => *offset,
            };
            values.write_u16::<BigEndian>(0x100 + i as u16).unwrap();
            values.write_u16::<BigEndian>(key_offset).unwrap();
            values.write_u16::<BigEndian>(0x200 + i as u16).unwrap();
            values.write_u16::<BigEndian>(value.slot.len() as u16).unwrap();
            values.write_u8(value.ty).unwrap();
            values.extend_from_slice(&value.slot);
            values.write_u8(0).unwrap();
        }
        values.extend_from_slice(END_MARKER);
        buf[VALUES_REGION_OFFSET..VALUES_REGION_OFFSET + values.len()].copy_from_slice(&values);

        buf
    }
}

fn write_key(out: &mut Vec<u8>, tag: u16, ty: u8, name: &[u8]) {
    out.write_u16::<BigEndian>(tag).unwrap();
    out.write_u16::<BigEndian>(name.len() as u16).unwrap();
    out.write_u8(ty).unwrap();
    out.extend_from_slice(name);
    out.write_u8(0).unwrap();
}

/// A slot of `len` bytes starting with `text`.
pub fn padded(text: &str, len: usize) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.resize(len, 0);
    out
}

/// The three network keys as the console lays them out.
pub fn dns_image() -> ImageBuilder {
    ImageBuilder::new()
        .key("/setting/net/ipAddress", 2)
        .key(DNS_FLAG, 1)
        .key(PRIMARY_DNS, 2)
        .key(SECONDARY_DNS, 2)
        .key("/setting/net/upnp", 0)
        .value("/setting/net/ipAddress", 2, &padded("192.168.1.20", 15))
        .value(DNS_FLAG, 1, &[0, 0, 0, 1])
        .value(PRIMARY_DNS, 2, &padded("1.1.1.1", 15))
        .value(SECONDARY_DNS, 2, &padded("1.0.0.1", 15))
        .value("/setting/net/upnp", 0, &[1])
}
