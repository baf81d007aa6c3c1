//! Field kinds, encoder tokens, and the per-kind encode/decode dispatch
//! (spec components C2/C3).
//!
//! Mirrors the shape of the teacher's `decoder.rs`: a thin dispatch
//! function (`try_decode_format` there, [`encode`]/[`decode`] here) that
//! matches on a small enum and calls into one submodule per family
//! (`decoder/track1.rs` etc there, [`fixed`]/[`variable`] here).

mod common;
mod fixed;
mod variable;

pub use common::PrefixWidth;

use crate::error::{ValidationError, WireError};
use std::fmt;

/// The six field kinds defined by the 1987 ISO 8583 field catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Fixed-length decimal digit string.
    Numeric,
    /// Fixed-length text, space-padded, codepage-transcoded.
    Alphanumeric,
    /// Fixed-length raw bytes.
    Binary,
    /// Variable-length digit string with a 2-digit length prefix.
    LLNumeric,
    /// Variable-length digit string with a 3-digit length prefix.
    LLLNumeric,
    /// Variable-length text with a 2-digit length prefix.
    LLVar,
    /// Variable-length text with a 3-digit length prefix.
    LLLVar,
    /// Variable-length text with an 8-digit length prefix.
    L8Var,
}

impl FieldKind {
    /// Parses a schema `kind` tag, returning `None` for an unrecognized
    /// token (the caller turns that into [`crate::error::CriticalError::FieldMustBeIso8583Type`]).
    pub fn parse(token: &str) -> Option<FieldKind> {
        Some(match token {
            "numeric" => FieldKind::Numeric,
            "alphanumeric" => FieldKind::Alphanumeric,
            "binary" => FieldKind::Binary,
            "llnumeric" => FieldKind::LLNumeric,
            "lllnumeric" => FieldKind::LLLNumeric,
            "llvar" => FieldKind::LLVar,
            "lllvar" => FieldKind::LLLVar,
            "l8var" => FieldKind::L8Var,
            _ => return None,
        })
    }

    /// Whether this kind is a variable-length (length-prefixed) kind.
    pub fn is_variable(self) -> bool {
        !matches!(self, FieldKind::Numeric | FieldKind::Alphanumeric | FieldKind::Binary)
    }

    /// The length-prefix width for a variable kind, or `None` for a fixed
    /// kind.
    pub fn prefix_width(self) -> Option<PrefixWidth> {
        match self {
            FieldKind::LLNumeric | FieldKind::LLVar => Some(PrefixWidth::Ll),
            FieldKind::LLLNumeric | FieldKind::LLLVar => Some(PrefixWidth::Lll),
            FieldKind::L8Var => Some(PrefixWidth::L8),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Numeric => "Numeric",
            FieldKind::Alphanumeric => "Alphanumeric",
            FieldKind::Binary => "Binary",
            FieldKind::LLNumeric => "LLNumeric",
            FieldKind::LLLNumeric => "LLLNumeric",
            FieldKind::LLVar => "LLVar",
            FieldKind::LLLVar => "LLLVar",
            FieldKind::L8Var => "L8Var",
        };
        f.write_str(name)
    }
}

/// A resolved content encoder: how the field's payload bytes are packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    /// Printable ASCII digits, or Windows-1252-transcoded text.
    Ascii,
    /// Left-aligned BCD.
    BcdLeft,
    /// Right-aligned BCD.
    BcdRight,
}

/// A resolved length-prefix encoder: how a variable field's length header
/// is packed. `bcd` and `rbcd` tokens both resolve here, since both
/// produce right-aligned BCD for the prefix (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthEncoding {
    /// Decimal ASCII digits, width 2/3/8.
    Ascii,
    /// Right-aligned BCD, width 1 (LL) or 2 (LLL) bytes.
    Bcd,
}

/// The raw encoder token carried on a descriptor before it is resolved
/// against a specific role (content vs. length). Unrecognized tokens are
/// preserved, not rejected, at the schema boundary (spec §4.7) — they only
/// fail the first time a codec tries to resolve them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderToken {
    Ascii,
    Bcd,
    Rbcd,
    Unknown(String),
}

impl EncoderToken {
    /// Parses a single schema encoder token (`ascii`, `bcd`, or `rbcd`).
    pub fn parse(token: &str) -> EncoderToken {
        match token {
            "ascii" => EncoderToken::Ascii,
            "bcd" => EncoderToken::Bcd,
            "rbcd" => EncoderToken::Rbcd,
            other => EncoderToken::Unknown(other.to_string()),
        }
    }

    /// Resolves this token as a content encoder.
    pub fn resolve_content(&self) -> Result<ContentEncoding, ValidationError> {
        match self {
            EncoderToken::Ascii => Ok(ContentEncoding::Ascii),
            EncoderToken::Bcd => Ok(ContentEncoding::BcdLeft),
            EncoderToken::Rbcd => Ok(ContentEncoding::BcdRight),
            EncoderToken::Unknown(_) => Err(ValidationError::InvalidEncoder),
        }
    }

    /// Resolves this token as a length-prefix encoder.
    pub fn resolve_length(&self) -> Result<LengthEncoding, ValidationError> {
        match self {
            EncoderToken::Ascii => Ok(LengthEncoding::Ascii),
            EncoderToken::Bcd | EncoderToken::Rbcd => Ok(LengthEncoding::Bcd),
            EncoderToken::Unknown(_) => Err(ValidationError::InvalidLengthEncoder),
        }
    }
}

/// The static metadata for one field number (spec C2). Carries no value —
/// values live in a [`crate::schema::FieldContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field number, 1..=192. 1 and 65 are reserved bitmap-presence bits
    /// and never appear as a user-visible descriptor.
    pub number: u8,
    /// The field kind.
    pub kind: FieldKind,
    /// Declared length. `None` is only valid for variable kinds, which
    /// fall back to the width implied by their length-prefix digits.
    pub max_length: Option<usize>,
    /// Content encoder token (resolved lazily at first encode/decode).
    pub content_encoding: EncoderToken,
    /// Length-prefix encoder token, for variable kinds only.
    pub length_encoding: Option<EncoderToken>,
}

impl FieldDescriptor {
    /// The max length to actually use: the declared value, or (variable
    /// kinds only) the width implied by the length-prefix digits.
    fn effective_max_length(&self) -> Result<usize, ValidationError> {
        match self.max_length {
            Some(len) => Ok(len),
            None => self
                .kind
                .prefix_width()
                .map(PrefixWidth::implied_max_length)
                .ok_or(ValidationError::MissingLength),
        }
    }
}

/// A field's value, typed by which of the three semantic domains its kind
/// belongs to (spec §3). Absence of a value is represented by
/// [`FieldValue::Empty`], matching the "empty means absent" presence rule
/// (invariant 4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// Absent.
    #[default]
    Empty,
    /// A decimal digit string (Numeric family).
    Digits(String),
    /// Text, transcoded through the Windows-1252 codepage on the wire
    /// (Alphanumeric, LLVar/LLLVar/L8Var).
    Text(String),
    /// Raw bytes (Binary).
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// A field is present iff its value is non-empty (invariant 4).
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Digits(s) | FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bytes(b) => !b.is_empty(),
        }
    }

    fn as_digits(&self) -> Result<&str, WireError> {
        match self {
            FieldValue::Digits(s) => Ok(s),
            _ => Err(WireError::BadRawData),
        }
    }

    fn as_text(&self) -> Result<&str, WireError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            _ => Err(WireError::BadRawData),
        }
    }

    fn as_bytes(&self) -> Result<&[u8], WireError> {
        match self {
            FieldValue::Bytes(b) => Ok(b),
            _ => Err(WireError::BadRawData),
        }
    }
}

/// Non-digit content in a Numeric-family value is rejected with
/// `bad raw data` (spec §9 — no dedicated literal is defined for this
/// case).
fn validate_digits(digits: &str) -> Result<(), WireError> {
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(WireError::BadRawData)
    }
}

/// Encodes one field's value per its descriptor (spec C3). The return type
/// is [`WireError`] rather than [`ValidationError`] because not every
/// failure here is descriptor-tier: a non-digit Numeric value is a
/// malformed *value*, not a malformed *descriptor*, so it surfaces as
/// `WireError::BadRawData` and is wrapped `field <N>: bad raw data` by
/// [`crate::message::Message::to_bytes`] rather than bubbling up
/// unwrapped (spec §4.5 point 3, DESIGN.md Open-Question-2).
pub fn encode(descriptor: &FieldDescriptor, value: &FieldValue) -> Result<Vec<u8>, WireError> {
    let max_length = descriptor.effective_max_length()?;
    let bytes = match descriptor.kind {
        FieldKind::Numeric => {
            let digits = value.as_digits()?;
            validate_digits(digits)?;
            let content = descriptor.content_encoding.resolve_content()?;
            fixed::encode_numeric(digits, max_length, content)?
        }
        FieldKind::Alphanumeric => {
            let text = value.as_text()?;
            require_ascii_content(descriptor)?;
            fixed::encode_alphanumeric(text, max_length)?
        }
        FieldKind::Binary => {
            let bytes = value.as_bytes()?;
            fixed::encode_binary(bytes, max_length)?
        }
        FieldKind::LLNumeric | FieldKind::LLLNumeric => {
            let digits = value.as_digits()?;
            validate_digits(digits)?;
            let content = descriptor.content_encoding.resolve_content()?;
            let length_encoding = resolve_length(descriptor)?;
            let width = descriptor.kind.prefix_width().expect("variable kind");
            variable::encode_numeric(digits, max_length, content, length_encoding, width, descriptor.kind)?
        }
        FieldKind::LLVar | FieldKind::LLLVar | FieldKind::L8Var => {
            let text = value.as_text()?;
            require_ascii_content(descriptor)?;
            let length_encoding = resolve_length(descriptor)?;
            let width = descriptor.kind.prefix_width().expect("variable kind");
            variable::encode_text(text, max_length, length_encoding, width, descriptor.kind)?
        }
    };
    Ok(bytes)
}

/// Decodes one field's value from `data`, returning `(value,
/// bytes_consumed)`. [`crate::message::Message::load`] wraps any error
/// with `field <N>: ` unconditionally (spec §4.5 decode mirror).
pub fn decode(descriptor: &FieldDescriptor, data: &[u8]) -> Result<(FieldValue, usize), WireError> {
    let max_length = descriptor.effective_max_length()?;
    match descriptor.kind {
        FieldKind::Numeric => {
            let content = descriptor.content_encoding.resolve_content()?;
            let (digits, consumed) = fixed::decode_numeric(data, max_length, content)?;
            Ok((FieldValue::Digits(digits), consumed))
        }
        FieldKind::Alphanumeric => {
            require_ascii_content(descriptor)?;
            let (text, consumed) = fixed::decode_alphanumeric(data, max_length)?;
            Ok((FieldValue::Text(text), consumed))
        }
        FieldKind::Binary => {
            let (bytes, consumed) = fixed::decode_binary(data, max_length)?;
            Ok((FieldValue::Bytes(bytes), consumed))
        }
        FieldKind::LLNumeric | FieldKind::LLLNumeric => {
            let content = descriptor.content_encoding.resolve_content()?;
            let length_encoding = resolve_length(descriptor)?;
            let width = descriptor.kind.prefix_width().expect("variable kind");
            let (digits, consumed) = variable::decode_numeric(data, content, length_encoding, width)?;
            Ok((FieldValue::Digits(digits), consumed))
        }
        FieldKind::LLVar | FieldKind::LLLVar | FieldKind::L8Var => {
            require_ascii_content(descriptor)?;
            let length_encoding = resolve_length(descriptor)?;
            let width = descriptor.kind.prefix_width().expect("variable kind");
            let (text, consumed) = variable::decode_text(data, length_encoding, width)?;
            Ok((FieldValue::Text(text), consumed))
        }
    }
}

fn resolve_length(descriptor: &FieldDescriptor) -> Result<LengthEncoding, ValidationError> {
    descriptor
        .length_encoding
        .as_ref()
        .ok_or(ValidationError::InvalidLengthEncoder)?
        .resolve_length()
}

/// Alphanumeric and text-variable kinds only support ASCII-family content
/// (spec §4.2 matrix: "ASCII only"); any other resolved encoder is
/// rejected.
fn require_ascii_content(descriptor: &FieldDescriptor) -> Result<(), ValidationError> {
    match descriptor.content_encoding.resolve_content()? {
        ContentEncoding::Ascii => Ok(()),
        _ => Err(ValidationError::InvalidEncoder),
    }
}
