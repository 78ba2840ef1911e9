//! Conversion between UTF-8 byte offsets and UTF-16 code unit offsets.
//!
//! Ranges are computed and sliced in bytes. Reports and the CLI publish
//! UTF-16 offsets so that a browser can pass them straight to `String.slice`.

use std::ops::Range;

/// Byte and UTF-16 offsets of every character boundary in a text.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    bytes: Vec<usize>,
    units: Vec<usize>,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut bytes = Vec::with_capacity(text.len() + 1);
        let mut units = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;

        for (byte, c) in text.char_indices() {
            bytes.push(byte);
            units.push(unit);
            unit += c.len_utf16();
        }
        bytes.push(text.len());
        units.push(unit);

        Self { bytes, units }
    }

    /// Length of the text in UTF-16 code units.
    pub fn utf16_len(&self) -> usize {
        self.units.last().copied().unwrap_or(0)
    }

    /// UTF-16 offset of a byte offset. `None` unless `byte` is a char boundary.
    pub fn to_utf16(&self, byte: usize) -> Option<usize> {
        self.bytes.binary_search(&byte).ok().map(|i| self.units[i])
    }

    /// Byte offset of a UTF-16 offset. `None` inside a surrogate pair or past the end.
    pub fn to_byte(&self, unit: usize) -> Option<usize> {
        self.units.binary_search(&unit).ok().map(|i| self.bytes[i])
    }

    pub fn range_to_utf16(&self, range: Range<usize>) -> Option<Range<usize>> {
        Some(self.to_utf16(range.start)?..self.to_utf16(range.end)?)
    }

    pub fn range_to_bytes(&self, range: Range<usize>) -> Option<Range<usize>> {
        Some(self.to_byte(range.start)?..self.to_byte(range.end)?)
    }

    /// Slice `text` by a UTF-16 range. `text` must be the text this map was built from.
    pub fn slice<'a>(&self, text: &'a str, range: Range<usize>) -> Option<&'a str> {
        text.get(self.range_to_bytes(range)?)
    }
}

/// UTF-16 offset of a byte offset in `text`, for one-off conversions.
pub fn utf16_offset(text: &str, byte: usize) -> Option<usize> {
    text.get(..byte).map(|prefix| prefix.encode_utf16().count())
}
