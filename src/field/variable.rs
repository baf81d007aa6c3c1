//! Variable-length field families: LLNumeric/LLLNumeric (digit content,
//! pluggable content encoding) and LLVar/LLLVar/L8Var (text content,
//! codepage-transcoded only).

use crate::error::{ValidationError, WireError};
use crate::field::common::{decode_length_prefix, encode_length_prefix, PrefixWidth};
use crate::field::{ContentEncoding, FieldKind, LengthEncoding};

/// Encodes an LL/LLL-Numeric field: length prefix, then the digit string
/// packed per `content`.
pub fn encode_numeric(
    digits: &str,
    max_length: usize,
    content: ContentEncoding,
    length_encoding: LengthEncoding,
    width: PrefixWidth,
    kind: FieldKind,
) -> Result<Vec<u8>, ValidationError> {
    if digits.len() > max_length {
        return Err(ValidationError::TooLong {
            kind,
            def_len: max_length,
            len: digits.len(),
        });
    }
    let mut out = encode_length_prefix(digits.len(), width, length_encoding)?;
    out.extend(match content {
        ContentEncoding::Ascii => digits.as_bytes().to_vec(),
        ContentEncoding::BcdLeft => crate::bcd::lbcd(digits),
        ContentEncoding::BcdRight => crate::bcd::rbcd(digits),
    });
    Ok(out)
}

/// Decodes an LL/LLL-Numeric field, returning `(digits, bytes_consumed)`.
pub fn decode_numeric(
    data: &[u8],
    content: ContentEncoding,
    length_encoding: LengthEncoding,
    width: PrefixWidth,
) -> Result<(String, usize), WireError> {
    let (len, prefix_consumed) = decode_length_prefix(data, width, length_encoding)?;
    let rest = &data[prefix_consumed..];
    match content {
        ContentEncoding::Ascii => {
            if rest.len() < len {
                return Err(WireError::BadRawData);
            }
            let raw = &rest[..len];
            if !raw.iter().all(u8::is_ascii_digit) {
                return Err(WireError::BadRawData);
            }
            Ok((
                String::from_utf8(raw.to_vec()).expect("ascii digits"),
                prefix_consumed + len,
            ))
        }
        ContentEncoding::BcdLeft => {
            let body_width = len.div_ceil(2);
            if rest.len() < body_width {
                return Err(WireError::BadRawData);
            }
            let digits = crate::bcd::bcdl_to_ascii(&rest[..body_width], len)?;
            Ok((digits, prefix_consumed + body_width))
        }
        ContentEncoding::BcdRight => {
            let body_width = len.div_ceil(2);
            if rest.len() < body_width {
                return Err(WireError::BadRawData);
            }
            let digits = crate::bcd::bcdr_to_ascii(&rest[..body_width], len)?;
            Ok((digits, prefix_consumed + body_width))
        }
    }
}

/// Encodes an LLVar/LLLVar/L8Var field: length prefix, then codepage-encoded
/// text bytes.
pub fn encode_text(
    text: &str,
    max_length: usize,
    length_encoding: LengthEncoding,
    width: PrefixWidth,
    kind: FieldKind,
) -> Result<Vec<u8>, ValidationError> {
    let body = crate::codepage::encode(text);
    if body.len() > max_length {
        return Err(ValidationError::TooLong {
            kind,
            def_len: max_length,
            len: body.len(),
        });
    }
    let mut out = encode_length_prefix(body.len(), width, length_encoding)?;
    out.extend(body);
    Ok(out)
}

/// Decodes an LLVar/LLLVar/L8Var field, returning `(text, bytes_consumed)`.
pub fn decode_text(
    data: &[u8],
    length_encoding: LengthEncoding,
    width: PrefixWidth,
) -> Result<(String, usize), WireError> {
    let (len, prefix_consumed) = decode_length_prefix(data, width, length_encoding)?;
    let rest = &data[prefix_consumed..];
    if rest.len() < len {
        return Err(WireError::BadRawData);
    }
    Ok((
        crate::codepage::decode(&rest[..len]),
        prefix_consumed + len,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ll_numeric_ascii_round_trips() {
        let encoded = encode_numeric(
            "4276555555555555".get(0..6).unwrap(),
            99,
            ContentEncoding::Ascii,
            LengthEncoding::Ascii,
            PrefixWidth::Ll,
            FieldKind::LLNumeric,
        )
        .unwrap();
        assert_eq!(encoded, b"06427655");
        let (digits, consumed) =
            decode_numeric(&encoded, ContentEncoding::Ascii, LengthEncoding::Ascii, PrefixWidth::Ll)
                .unwrap();
        assert_eq!(digits, "427655");
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn lll_var_text_round_trips_spec_fixture() {
        let encoded = encode_text(
            "Another test text",
            999,
            LengthEncoding::Ascii,
            PrefixWidth::Lll,
            FieldKind::LLLVar,
        )
        .unwrap();
        assert_eq!(&encoded[..3], b"017");
        let (text, consumed) =
            decode_text(&encoded, LengthEncoding::Ascii, PrefixWidth::Lll).unwrap();
        assert_eq!(text, "Another test text");
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn length_overflow_is_rejected() {
        let value = "1".repeat(100);
        let err = encode_numeric(
            &value,
            999,
            ContentEncoding::Ascii,
            LengthEncoding::Ascii,
            PrefixWidth::Ll,
            FieldKind::LLNumeric,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidLengthHead);
    }
}
