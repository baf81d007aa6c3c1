//! Fixed-width field families: Numeric, Alphanumeric, Binary.

use crate::error::{ValidationError, WireError};
use crate::field::{ContentEncoding, FieldKind};

/// Encodes a fixed Numeric field: left-pad with `'0'` to `max_length`
/// digits, then pack per `encoding`.
pub fn encode_numeric(
    digits: &str,
    max_length: usize,
    encoding: ContentEncoding,
) -> Result<Vec<u8>, ValidationError> {
    if digits.len() > max_length {
        return Err(ValidationError::TooLong {
            kind: FieldKind::Numeric,
            def_len: max_length,
            len: digits.len(),
        });
    }
    let padded = format!("{:0>width$}", digits, width = max_length);
    Ok(match encoding {
        ContentEncoding::Ascii => padded.into_bytes(),
        ContentEncoding::BcdLeft => crate::bcd::lbcd(&padded),
        ContentEncoding::BcdRight => crate::bcd::rbcd(&padded),
    })
}

/// Decodes a fixed Numeric field, returning `(digits, bytes_consumed)`.
pub fn decode_numeric(
    data: &[u8],
    max_length: usize,
    encoding: ContentEncoding,
) -> Result<(String, usize), WireError> {
    match encoding {
        ContentEncoding::Ascii => {
            if data.len() < max_length {
                return Err(WireError::BadRawData);
            }
            let raw = &data[..max_length];
            if !raw.iter().all(u8::is_ascii_digit) {
                return Err(WireError::BadRawData);
            }
            Ok((String::from_utf8(raw.to_vec()).expect("ascii digits"), max_length))
        }
        ContentEncoding::BcdLeft => {
            let width = max_length.div_ceil(2);
            if data.len() < width {
                return Err(WireError::BadRawData);
            }
            let digits = crate::bcd::bcdl_to_ascii(&data[..width], max_length)?;
            Ok((digits, width))
        }
        ContentEncoding::BcdRight => {
            let width = max_length.div_ceil(2);
            if data.len() < width {
                return Err(WireError::BadRawData);
            }
            let digits = crate::bcd::bcdr_to_ascii(&data[..width], max_length)?;
            Ok((digits, width))
        }
    }
}

/// Encodes a fixed Alphanumeric field: transcode via the Windows-1252
/// codepage, then right-pad with spaces to `max_length`.
pub fn encode_alphanumeric(text: &str, max_length: usize) -> Result<Vec<u8>, ValidationError> {
    let mut bytes = crate::codepage::encode(text);
    if bytes.len() > max_length {
        return Err(ValidationError::TooLong {
            kind: FieldKind::Alphanumeric,
            def_len: max_length,
            len: bytes.len(),
        });
    }
    bytes.resize(max_length, b' ');
    Ok(bytes)
}

/// Decodes a fixed Alphanumeric field verbatim (no trimming), per spec §9.
pub fn decode_alphanumeric(data: &[u8], max_length: usize) -> Result<(String, usize), WireError> {
    if data.len() < max_length {
        return Err(WireError::BadRawData);
    }
    Ok((crate::codepage::decode(&data[..max_length]), max_length))
}

/// Encodes a fixed Binary field. The caller's bytes are right-padded with
/// zero bytes to `max_length` if shorter; longer values error.
pub fn encode_binary(value: &[u8], max_length: usize) -> Result<Vec<u8>, ValidationError> {
    if value.len() > max_length {
        return Err(ValidationError::TooLong {
            kind: FieldKind::Binary,
            def_len: max_length,
            len: value.len(),
        });
    }
    let mut out = value.to_vec();
    out.resize(max_length, 0);
    Ok(out)
}

/// Decodes a fixed Binary field, returning `(bytes, bytes_consumed)`.
pub fn decode_binary(data: &[u8], max_length: usize) -> Result<(Vec<u8>, usize), WireError> {
    if data.len() < max_length {
        return Err(WireError::BadRawData);
    }
    Ok((data[..max_length].to_vec(), max_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ascii_left_pads_with_zero() {
        let encoded = encode_numeric("6", 4, ContentEncoding::Ascii).unwrap();
        assert_eq!(encoded, b"0006");
    }

    #[test]
    fn numeric_rbcd_matches_spec_edge_case() {
        // F19 in spec E4: declared length 3, value "643".
        let encoded = encode_numeric("643", 3, ContentEncoding::BcdRight).unwrap();
        assert_eq!(encoded, vec![0x06, 0x43]);
        let (digits, consumed) = decode_numeric(&encoded, 3, ContentEncoding::BcdRight).unwrap();
        assert_eq!(digits, "643");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn numeric_lbcd_matches_spec_edge_case() {
        let encoded = encode_numeric("643", 3, ContentEncoding::BcdLeft).unwrap();
        assert_eq!(encoded, vec![0x64, 0x30]);
        let (digits, _) = decode_numeric(&encoded, 3, ContentEncoding::BcdLeft).unwrap();
        assert_eq!(digits, "643");
    }

    #[test]
    fn numeric_too_long_is_rejected() {
        let err = encode_numeric("12345", 4, ContentEncoding::Ascii).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                kind: FieldKind::Numeric,
                def_len: 4,
                len: 5
            }
        );
    }

    #[test]
    fn alphanumeric_right_pads_with_spaces() {
        let encoded = encode_alphanumeric("Test text", 40).unwrap();
        assert_eq!(encoded.len(), 40);
        assert!(encoded.ends_with(b"    "));
        let (decoded, _) = decode_alphanumeric(&encoded, 40).unwrap();
        assert_eq!(decoded.trim_end(), "Test text");
    }

    #[test]
    fn binary_round_trips() {
        let encoded = encode_binary(&[0xDE, 0xAD], 4).unwrap();
        assert_eq!(encoded, vec![0xDE, 0xAD, 0x00, 0x00]);
        let (decoded, consumed) = decode_binary(&encoded, 4).unwrap();
        assert_eq!(decoded, vec![0xDE, 0xAD, 0x00, 0x00]);
        assert_eq!(consumed, 4);
    }
}
