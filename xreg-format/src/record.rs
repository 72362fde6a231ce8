use std::borrow::Cow;
use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::layout::{KEYS_HEADER_SIZE, VALUE_HEADER_LEN};

pub mod constants {
    pub const VALUE_TYPE_BOOL: u8 = 0x00;
    pub const VALUE_TYPE_INTEGER: u8 = 0x01;
    pub const VALUE_TYPE_STRING: u8 = 0x02;
}

use self::constants::*;

/// Type discriminator stored in every value record.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum ValueType {
    Bool,
    /// 32-bit big-endian integer in a 4 byte slot.
    Integer,
    /// Raw bytes, usually NUL padded ASCII.
    String,
    Unknown(u8),
}

impl ValueType {
    pub const fn available_variants() -> &'static [&'static str] {
        &["bool", "int", "string"]
    }

    pub const fn id(self) -> u8 {
        use ValueType::*;

        match self {
            Bool => VALUE_TYPE_BOOL,
            Integer => VALUE_TYPE_INTEGER,
            String => VALUE_TYPE_STRING,
            Unknown(id) => id,
        }
    }

    pub const fn from_id(id: u8) -> ValueType {
        use ValueType::*;

        match id {
            VALUE_TYPE_BOOL => Bool,
            VALUE_TYPE_INTEGER => Integer,
            VALUE_TYPE_STRING => String,
            id => Unknown(id),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValueType::*;

        let s = match self {
            Bool => "bool",
            Integer => "int",
            String => "string",
            Unknown(id) => return write!(f, "Unknown(id: {:x})", id),
        };

        write!(f, "{}", s)
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyRecord {
    /// Absolute position of the record header in the file.
    pub file_offset: u32,

    /// Opaque, preserved as read.
    pub tag: u16,

    /// Declared length of the key string, excluding the terminator.
    pub length: u16,

    /// Opaque, preserved as read.
    pub key_type: u8,

    /// The key string, exactly `length` bytes.
    pub name: Vec<u8>,
}

impl KeyRecord {
    #[inline(always)]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// The key name for display. Keys are compared as raw bytes, never through this.
    #[inline(always)]
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValueRecord {
    /// Absolute position of the record header in the file.
    pub file_offset: u32,

    /// Opaque, preserved as read.
    pub tag1: u16,

    /// Offset of the owning key, relative to the end of the keys region header.
    pub key_offset: u16,

    /// Opaque, preserved as read.
    pub tag2: u16,

    /// Size of the payload slot. Fixed for the lifetime of the file.
    pub length: u16,

    pub value_type: ValueType,

    /// Copy of the payload slot, always `length` bytes.
    pub data: Vec<u8>,
}

impl ValueRecord {
    /// Absolute file offset of the key record this value belongs to.
    #[inline(always)]
    pub fn owner_offset(&self) -> u32 {
        u32::from(self.key_offset) + KEYS_HEADER_SIZE as u32
    }

    #[inline(always)]
    pub fn is_owned_by(&self, key: &KeyRecord) -> bool {
        self.owner_offset() == key.file_offset
    }

    /// Absolute file offset of the first payload byte.
    #[inline(always)]
    pub fn payload_offset(&self) -> usize {
        self.file_offset as usize + VALUE_HEADER_LEN
    }

    #[inline(always)]
    pub fn slot_len(&self) -> usize {
        self.length as usize
    }

    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bool(&self) -> Option<bool> {
        if self.value_type != ValueType::Bool {
            return None;
        }
        self.data.first().map(|b| *b != 0)
    }

    /// Integers are only decoded from slots of exactly four bytes.
    pub fn as_int(&self) -> Option<i32> {
        if self.value_type != ValueType::Integer || self.data.len() != 4 {
            return None;
        }
        Some(BigEndian::read_i32(&self.data))
    }

    /// String payload up to the first NUL, unsanitized.
    pub fn as_text(&self) -> Option<&[u8]> {
        if self.value_type != ValueType::String {
            return None;
        }
        let end = self
            .data
            .iter()
            .position(|b| *b == 0)
            .unwrap_or_else(|| self.data.len());
        Some(&self.data[..end])
    }

    /// Overwrites the payload copy, zero filling up to the slot length.
    pub(crate) fn fill(&mut self, payload: &[u8]) {
        fill_slot(&mut self.data, payload);
    }
}

/// Copies `payload` to the start of `slot` and zeroes the rest of it.
#[inline(always)]
pub(crate) fn fill_slot(slot: &mut [u8], payload: &[u8]) {
    let (head, tail) = slot.split_at_mut(payload.len());
    head.copy_from_slice(payload);
    for b in tail.iter_mut() {
        *b = 0;
    }
}
