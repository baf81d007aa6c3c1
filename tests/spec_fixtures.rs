//! End-to-end fixtures against a fixed schema, covering the concrete
//! scenarios a counterparty's own test suite would exercise byte-for-byte.

use iso8583_codec::bitmap::{Bitmap, BitmapStyle};
use iso8583_codec::field::{EncoderToken, FieldDescriptor, FieldKind, FieldValue};
use iso8583_codec::message::{Message, MtiEncoding};
use iso8583_codec::schema::Schema;
use iso8583_codec::TemplateRegistry;

fn fixture_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor {
            number: 2,
            kind: FieldKind::LLNumeric,
            max_length: Some(19),
            content_encoding: EncoderToken::Ascii,
            length_encoding: Some(EncoderToken::Ascii),
        },
        FieldDescriptor {
            number: 3,
            kind: FieldKind::Numeric,
            max_length: Some(6),
            content_encoding: EncoderToken::Ascii,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 4,
            kind: FieldKind::Numeric,
            max_length: Some(12),
            content_encoding: EncoderToken::Ascii,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 11,
            kind: FieldKind::Numeric,
            max_length: Some(6),
            content_encoding: EncoderToken::Ascii,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 19,
            kind: FieldKind::Numeric,
            max_length: Some(3),
            content_encoding: EncoderToken::Rbcd,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 41,
            kind: FieldKind::Alphanumeric,
            max_length: Some(8),
            content_encoding: EncoderToken::Ascii,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 43,
            kind: FieldKind::Alphanumeric,
            max_length: Some(40),
            content_encoding: EncoderToken::Ascii,
            length_encoding: None,
        },
        FieldDescriptor {
            number: 120,
            kind: FieldKind::LLLVar,
            max_length: Some(999),
            content_encoding: EncoderToken::Ascii,
            length_encoding: Some(EncoderToken::Ascii),
        },
    ])
}

fn fixture_message(mti_encoding: MtiEncoding, bitmap_style: BitmapStyle, force_second: bool) -> Message {
    let mut message = Message::new("0100", fixture_schema(), mti_encoding, bitmap_style, force_second);
    message.set(2, FieldValue::Digits("4276555555555555".to_string())).unwrap();
    message.set(3, FieldValue::Digits("000000".to_string())).unwrap();
    message
        .set(43, FieldValue::Text(format!("{}Test text", " ".repeat(31))))
        .unwrap();
    message.set(120, FieldValue::Text("Another test text".to_string())).unwrap();
    message
}

#[test]
fn e1_canonical_ascii_bitmap_round_trips() {
    let message = fixture_message(MtiEncoding::Ascii, BitmapStyle::AsciiHex, false);
    let bytes = message.to_bytes().unwrap();

    assert_eq!(&bytes[..4], b"0100");
    // Fields 2, 3, 43, 120 present; 120 > 64 forces bit 1 (secondary map
    // follows) alongside bits 2 and 3. Primary nibble for fields 1-4 is
    // 0xE (bits 1,2,3 set, bit 4 clear); nibble for fields 41-44 is 0x2
    // (bit 43 set). Secondary nibble for fields 117-120 is 0x1 (bit 120
    // set). Cross-checked against an independently built `Bitmap`.
    assert_eq!(&bytes[4..20], b"E000000000200000");
    assert_eq!(&bytes[20..36], b"0000000000000100");
    let expected_bitmap = Bitmap::from_fields([2, 3, 43, 120]).to_bytes(BitmapStyle::AsciiHex, false);
    assert_eq!(&bytes[4..4 + expected_bitmap.len()], expected_bitmap.as_slice());

    let mut decoded = Message::new(
        "0000",
        fixture_schema(),
        MtiEncoding::Ascii,
        BitmapStyle::AsciiHex,
        false,
    );
    let consumed = decoded.load(&bytes).unwrap();
    assert_eq!(consumed, bytes.len());
    assert_eq!(decoded.mti(), "0100");
    assert_eq!(
        decoded.get(2),
        Some(&FieldValue::Digits("4276555555555555".to_string()))
    );
    assert_eq!(decoded.get(3), Some(&FieldValue::Digits("000000".to_string())));
    assert_eq!(
        decoded.get(120),
        Some(&FieldValue::Text("Another test text".to_string()))
    );
}

#[test]
fn e2_packed_bitmap_with_second_bitmap_forced() {
    let message = fixture_message(MtiEncoding::Ascii, BitmapStyle::Packed, true);
    let bytes = message.to_bytes().unwrap();

    assert_eq!(bytes[4] & 0x80, 0x80, "forced secondary sets bit 1");
    // MTI(4) + primary(8) + secondary(8) = 20 bytes of preamble.
    assert!(bytes.len() > 20);

    let mut decoded = Message::new("0000", fixture_schema(), MtiEncoding::Ascii, BitmapStyle::Packed, true);
    decoded.load(&bytes).unwrap();
    assert_eq!(
        decoded.get(43),
        Some(&FieldValue::Text(format!("{}Test text", " ".repeat(31))))
    );
}

#[test]
fn e3_bcd_mti_round_trips() {
    let message = fixture_message(MtiEncoding::Bcd, BitmapStyle::Packed, false);
    let bytes = message.to_bytes().unwrap();
    assert_eq!(&bytes[..2], &[0x01, 0x00]);

    let mut decoded = Message::new("0000", fixture_schema(), MtiEncoding::Bcd, BitmapStyle::Packed, false);
    decoded.load(&bytes).unwrap();
    assert_eq!(decoded.mti(), "0100");
}

#[test]
fn e4_rbcd_numeric_edge_case_round_trips_both_encoders() {
    let rbcd_descriptor = FieldDescriptor {
        number: 19,
        kind: FieldKind::Numeric,
        max_length: Some(3),
        content_encoding: EncoderToken::Rbcd,
        length_encoding: None,
    };
    let encoded = iso8583_codec::field::encode(&rbcd_descriptor, &FieldValue::Digits("643".to_string())).unwrap();
    assert_eq!(encoded, vec![0x06, 0x43]);
    let (value, _) = iso8583_codec::field::decode(&rbcd_descriptor, &encoded).unwrap();
    assert_eq!(value, FieldValue::Digits("643".to_string()));

    let lbcd_descriptor = FieldDescriptor {
        content_encoding: EncoderToken::Bcd,
        ..rbcd_descriptor
    };
    let encoded = iso8583_codec::field::encode(&lbcd_descriptor, &FieldValue::Digits("643".to_string())).unwrap();
    assert_eq!(encoded, vec![0x64, 0x30]);
    let (value, _) = iso8583_codec::field::decode(&lbcd_descriptor, &encoded).unwrap();
    assert_eq!(value, FieldValue::Digits("643".to_string()));
}

#[test]
fn e5_length_prefix_overflow_fails_encode() {
    let descriptor = FieldDescriptor {
        number: 2,
        kind: FieldKind::LLNumeric,
        max_length: Some(999),
        content_encoding: EncoderToken::Ascii,
        length_encoding: Some(EncoderToken::Ascii),
    };
    let value = FieldValue::Digits("1".repeat(100));
    let err = iso8583_codec::field::encode(&descriptor, &value).unwrap_err();
    assert_eq!(
        err,
        iso8583_codec::error::WireError::Validation(iso8583_codec::error::ValidationError::InvalidLengthHead)
    );
}

#[test]
fn e6_template_registry_parses_registered_mti() {
    let registry = TemplateRegistry::new(BitmapStyle::AsciiHex);
    registry.register("0100", fixture_schema()).unwrap();

    let message = fixture_message(MtiEncoding::Ascii, BitmapStyle::AsciiHex, false);
    let bytes = message.to_bytes().unwrap();

    let parsed = registry.parse(&bytes).unwrap();
    assert_eq!(parsed.mti(), "0100");
    assert_eq!(
        parsed.get(43),
        Some(&FieldValue::Text(format!("{}Test text", " ".repeat(31))))
    );
}
