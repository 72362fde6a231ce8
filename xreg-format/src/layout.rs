//! Fixed layout of an `xRegistry.sys` file.
//!
//! The file starts with two 64 KiB regions. The keys region begins with a
//! 16 byte header that is never interpreted, followed by key records. The
//! values region follows immediately and holds value records with no header.
//! All integers are big-endian.

/// Size of each of the keys and values regions.
pub const REGION_SIZE: usize = 0x10000;

pub const KEYS_REGION_OFFSET: usize = 0x0;

/// Bytes reserved at the start of the keys region. Value records store the
/// offset of their key relative to the end of this header.
pub const KEYS_HEADER_SIZE: usize = 0x10;

pub const VALUES_REGION_OFFSET: usize = KEYS_REGION_OFFSET + REGION_SIZE;

/// `[u16 tag][u16 length][u8 type]`
pub const KEY_HEADER_LEN: usize = 5;

/// `[u16 tag1][u16 key offset][u16 tag2][u16 length][u8 type]`
pub const VALUE_HEADER_LEN: usize = 9;

/// Every key string and value payload is followed by one terminator byte.
pub const TERMINATOR_LEN: usize = 1;

/// Appears in place of a record header once a region has no more records.
pub const END_MARKER: &[u8; 7] = b"\xAA\xBB\xCC\xDD\xEE\x00\x00";

/// A bounded span of the file scanned for records.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct Region {
    pub(crate) name: &'static str,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Region {
    pub(crate) const KEYS: Region = Region {
        name: "keys",
        start: KEYS_REGION_OFFSET + KEYS_HEADER_SIZE,
        end: KEYS_REGION_OFFSET + REGION_SIZE,
    };

    pub(crate) const VALUES: Region = Region {
        name: "values",
        start: VALUES_REGION_OFFSET,
        end: VALUES_REGION_OFFSET + REGION_SIZE,
    };

    /// The end of the region, clamped to a buffer of `len` bytes.
    #[inline(always)]
    pub(crate) fn end_within(&self, len: usize) -> usize {
        self.end.min(len)
    }
}
