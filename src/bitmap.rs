//! Bitmap (C4): the 64/128/192-bit field-presence vector and its two wire
//! encodings (packed binary, ASCII hex).

use crate::error::WireError;

/// How a bitmap is serialized on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapStyle {
    /// 8/16/24 raw bytes per map.
    Packed,
    /// 16/32/48 uppercase hex characters per map.
    AsciiHex,
}

/// A logical set of field numbers in `[1, 192]`, tracked as up to three
/// 64-bit words (primary / secondary / tertiary).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    words: [u64; 3],
}

impl Bitmap {
    /// An empty bitmap.
    pub fn new() -> Bitmap {
        Bitmap::default()
    }

    /// Builds a bitmap from an ascending iterator of present field numbers
    /// (1-based, excluding the reserved presence bits 1 and 65).
    pub fn from_fields<I: IntoIterator<Item = u8>>(fields: I) -> Bitmap {
        let mut bitmap = Bitmap::new();
        for field in fields {
            bitmap.set(field);
        }
        bitmap
    }

    /// Sets bit `k` (1-indexed, 1..=192).
    pub fn set(&mut self, k: u8) {
        let (word, bit) = Self::locate(k);
        self.words[word] |= 1u64 << bit;
    }

    /// Whether bit `k` is set.
    pub fn is_set(&self, k: u8) -> bool {
        let (word, bit) = Self::locate(k);
        self.words[word] & (1u64 << bit) != 0
    }

    fn locate(k: u8) -> (usize, u8) {
        let zero_based = (k - 1) as usize;
        let word = zero_based / 64;
        let within_word = (zero_based % 64) as u8;
        (word, 63 - within_word)
    }

    /// The largest present field number, or `None` if the bitmap is empty.
    pub fn max_field(&self) -> Option<u8> {
        (1..=192u8).rev().find(|&k| self.is_set(k))
    }

    /// Whether a secondary bitmap must be emitted: some field beyond 64 is
    /// present, or the caller forces it.
    pub fn needs_secondary(&self, force: bool) -> bool {
        force || self.max_field().map(|m| m > 64).unwrap_or(false)
    }

    /// Whether a tertiary bitmap must be emitted: some field beyond 128 is
    /// present.
    pub fn needs_tertiary(&self) -> bool {
        self.max_field().map(|m| m > 128).unwrap_or(false)
    }

    /// Iterates the set bits in ascending order, field numbers 2..=192
    /// (the reserved presence bits 1 and 65 are never yielded).
    pub fn iter_fields(&self) -> impl Iterator<Item = u8> + '_ {
        (2..=192u8).filter(|&k| k != 65 && self.is_set(k))
    }

    /// Serializes the bitmap(s) implied by `self` per the emission policy:
    /// primary always; secondary if `needs_secondary`; tertiary if
    /// `needs_tertiary`. Presence bits 1/65 are set on the preceding map as
    /// required.
    pub fn to_bytes(&self, style: BitmapStyle, force_second: bool) -> Vec<u8> {
        let mut emit = self.clone();
        let secondary = emit.needs_secondary(force_second);
        let tertiary = emit.needs_tertiary();
        if secondary {
            emit.set(1);
        }
        if tertiary {
            emit.set(65);
        }
        let mut maps = vec![emit.words[0]];
        if secondary {
            maps.push(emit.words[1]);
        }
        if tertiary {
            maps.push(emit.words[2]);
        }
        let mut out = Vec::new();
        for word in maps {
            let bytes = word.to_be_bytes();
            match style {
                BitmapStyle::Packed => out.extend_from_slice(&bytes),
                BitmapStyle::AsciiHex => out.extend(hex_upper(&bytes)),
            }
        }
        out
    }

    /// Reads one mandatory bitmap from `data`, then a second and/or third
    /// as indicated by the presence bits, returning `(bitmap,
    /// bytes_consumed)`.
    pub fn from_bytes(data: &[u8], style: BitmapStyle) -> Result<(Bitmap, usize), WireError> {
        let map_width = match style {
            BitmapStyle::Packed => 8,
            BitmapStyle::AsciiHex => 16,
        };
        let mut bitmap = Bitmap::new();
        let mut consumed = 0;

        let primary = read_word(data, consumed, map_width, style)?;
        bitmap.words[0] = primary;
        consumed += map_width;

        if primary & (1u64 << 63) != 0 {
            let secondary = read_word(data, consumed, map_width, style)?;
            bitmap.words[1] = secondary;
            consumed += map_width;

            if secondary & (1u64 << 63) != 0 {
                let tertiary = read_word(data, consumed, map_width, style)?;
                bitmap.words[2] = tertiary;
                consumed += map_width;
            }
        }

        Ok((bitmap, consumed))
    }
}

fn read_word(data: &[u8], offset: usize, width: usize, style: BitmapStyle) -> Result<u64, WireError> {
    if data.len() < offset + width {
        return Err(WireError::BadRawData);
    }
    let raw = &data[offset..offset + width];
    match style {
        BitmapStyle::Packed => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(raw);
            Ok(u64::from_be_bytes(buf))
        }
        BitmapStyle::AsciiHex => {
            let text = std::str::from_utf8(raw).map_err(|_| WireError::BadRawData)?;
            u64::from_str_radix(text, 16).map_err(|_| WireError::BadRawData)
        }
    }
}

fn hex_upper(bytes: &[u8]) -> Vec<u8> {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = Vec::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(DIGITS[(byte >> 4) as usize]);
        out.push(DIGITS[(byte & 0x0F) as usize]);
    }
    out
}
