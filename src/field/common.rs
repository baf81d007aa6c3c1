//! Length-prefix encode/decode shared by the three variable field families.

use crate::error::{literal_bytes, ValidationError, WireError};

/// The three variable-field length-prefix widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixWidth {
    /// LL: 2 decimal digits of length, max value 99.
    Ll,
    /// LLL: 3 decimal digits of length, max value 999.
    Lll,
    /// L8: 8 decimal digits of length, max value 99999999.
    L8,
}

impl PrefixWidth {
    /// Number of decimal digits in the ASCII rendering of the prefix.
    pub fn digits(self) -> usize {
        match self {
            PrefixWidth::Ll => 2,
            PrefixWidth::Lll => 3,
            PrefixWidth::L8 => 8,
        }
    }

    /// The largest length value the prefix can carry.
    pub fn max_value(self) -> usize {
        10usize.pow(self.digits() as u32) - 1
    }

    /// The implied `max_length` for a descriptor of this prefix width that
    /// declares no explicit length (spec §3).
    pub fn implied_max_length(self) -> usize {
        self.max_value()
    }
}

/// Encodes a length-prefix for a variable field.
pub fn encode_length_prefix(
    len: usize,
    width: PrefixWidth,
    length_encoding: super::LengthEncoding,
) -> Result<Vec<u8>, ValidationError> {
    if len > width.max_value() {
        return Err(ValidationError::InvalidLengthHead);
    }
    let digits = width.digits();
    match length_encoding {
        super::LengthEncoding::Ascii => Ok(format!("{:0width$}", len, width = digits).into_bytes()),
        super::LengthEncoding::Bcd => match width {
            PrefixWidth::L8 => Err(ValidationError::InvalidLengthEncoder),
            _ => Ok(crate::bcd::rbcd(&format!("{:0width$}", len, width = digits))),
        },
    }
}

/// Decodes a length-prefix, returning `(value, bytes_consumed)`.
pub fn decode_length_prefix(
    data: &[u8],
    width: PrefixWidth,
    length_encoding: super::LengthEncoding,
) -> Result<(usize, usize), WireError> {
    match length_encoding {
        super::LengthEncoding::Ascii => {
            let digits = width.digits();
            if data.len() < digits {
                return Err(WireError::BadRawData);
            }
            let raw = &data[..digits];
            let text = std::str::from_utf8(raw)
                .map_err(|_| WireError::ParseLengthHeadFailed(literal_bytes(raw)))?;
            let value: usize = text
                .parse()
                .map_err(|_| WireError::ParseLengthHeadFailed(literal_bytes(raw)))?;
            Ok((value, digits))
        }
        super::LengthEncoding::Bcd => match width {
            PrefixWidth::L8 => Err(ValidationError::InvalidLengthEncoder.into()),
            PrefixWidth::Ll => {
                if data.is_empty() {
                    return Err(WireError::BadRawData);
                }
                let digits = crate::bcd::bcdr_to_ascii(&data[..1], 2)?;
                Ok((digits.parse().expect("validated digits"), 1))
            }
            PrefixWidth::Lll => {
                if data.len() < 2 {
                    return Err(WireError::BadRawData);
                }
                let digits = crate::bcd::bcdr_to_ascii(&data[..2], 3)?;
                Ok((digits.parse().expect("validated digits"), 2))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LengthEncoding;

    #[test]
    fn ascii_prefix_round_trips() {
        let prefix = encode_length_prefix(17, PrefixWidth::Lll, LengthEncoding::Ascii).unwrap();
        assert_eq!(prefix, b"017");
        let (value, consumed) =
            decode_length_prefix(&prefix, PrefixWidth::Lll, LengthEncoding::Ascii).unwrap();
        assert_eq!(value, 17);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn bcd_prefix_round_trips() {
        let prefix = encode_length_prefix(64, PrefixWidth::Ll, LengthEncoding::Bcd).unwrap();
        assert_eq!(prefix, vec![0x64]);
        let (value, consumed) =
            decode_length_prefix(&prefix, PrefixWidth::Ll, LengthEncoding::Bcd).unwrap();
        assert_eq!(value, 64);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn overflowing_length_is_rejected() {
        let err = encode_length_prefix(100, PrefixWidth::Ll, LengthEncoding::Ascii).unwrap_err();
        assert_eq!(err, ValidationError::InvalidLengthHead);
    }

    #[test]
    fn l8_bcd_is_rejected() {
        let err = encode_length_prefix(1, PrefixWidth::L8, LengthEncoding::Bcd).unwrap_err();
        assert_eq!(err, ValidationError::InvalidLengthEncoder);
    }

    #[test]
    fn unparseable_ascii_prefix_reports_literal_bytes() {
        let err = decode_length_prefix(b"1A", PrefixWidth::Ll, LengthEncoding::Ascii).unwrap_err();
        assert_eq!(
            err,
            WireError::ParseLengthHeadFailed("1A".to_string())
        );
    }
}
