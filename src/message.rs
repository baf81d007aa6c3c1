//! Message assembler (C5): MTI, bitmap(s), and the field stream they
//! describe, driving the per-field codecs in [`crate::field`] in
//! ascending field-number order.

use tracing::{debug, trace, warn};

use crate::bitmap::{Bitmap, BitmapStyle};
use crate::error::Error;
use crate::field;
use crate::schema::{FieldContainer, Schema};

/// How the MTI is packed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtiEncoding {
    /// Four ASCII digit bytes.
    Ascii,
    /// Two bytes, one digit per nibble.
    Bcd,
}

/// A single ISO 8583 message: MTI plus the field values carried in
/// `container`, ready to serialize or to be overwritten by [`Message::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    mti: String,
    mti_encoding: MtiEncoding,
    bitmap_style: BitmapStyle,
    force_second_bitmap: bool,
    container: FieldContainer,
}

impl Message {
    /// Builds an empty message over `schema`.
    pub fn new(
        mti: impl Into<String>,
        schema: Schema,
        mti_encoding: MtiEncoding,
        bitmap_style: BitmapStyle,
        force_second_bitmap: bool,
    ) -> Message {
        Message {
            mti: mti.into(),
            mti_encoding,
            bitmap_style,
            force_second_bitmap,
            container: FieldContainer::new(schema),
        }
    }

    /// The message's MTI (the value last set by construction or, after a
    /// successful [`Message::load`], the value decoded from the wire).
    pub fn mti(&self) -> &str {
        &self.mti
    }

    /// The field container backing this message.
    pub fn container(&self) -> &FieldContainer {
        &self.container
    }

    /// Sets field `number`'s value.
    pub fn set(&mut self, number: u8, value: field::FieldValue) -> Result<(), Error> {
        self.container.set(number, value)
    }

    /// The current value of field `number`.
    pub fn get(&self, number: u8) -> Option<&field::FieldValue> {
        self.container.get(number)
    }

    /// Serializes this message to its wire form (spec §4.5 `to_bytes`).
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        debug!(mti = %self.mti, "encoding message");
        let mti_bytes = encode_mti(&self.mti, self.mti_encoding)?;

        let present: Vec<u8> = self.container.present_fields().collect();
        let bitmap = Bitmap::from_fields(present.iter().copied());
        let bitmap_bytes = bitmap.to_bytes(self.bitmap_style, self.force_second_bitmap);

        let mut out = mti_bytes;
        out.extend(bitmap_bytes);

        for number in present {
            let descriptor = self
                .container
                .schema()
                .get(number)
                .expect("present field without descriptor");
            let value = self.container.get(number).expect("present field without value");
            trace!(field = number, "encoding field");
            let encoded = field::encode(descriptor, value).map_err(|err| {
                warn!(field = number, %err, "field encode failed");
                Error::wrap_encode(number, err)
            })?;
            out.extend(encoded);
        }

        Ok(out)
    }

    /// Replaces this message's MTI and field values from wire bytes (spec
    /// §4.5 `load`). Fields absent from the decoded bitmap retain whatever
    /// value they held before the call. Returns the number of bytes
    /// consumed.
    pub fn load(&mut self, data: &[u8]) -> Result<usize, Error> {
        debug!(len = data.len(), "decoding message");
        let (mti, mti_consumed) = decode_mti(data, self.mti_encoding)?;
        self.mti = mti;

        let rest = &data[mti_consumed..];
        let (bitmap, bitmap_consumed) =
            Bitmap::from_bytes(rest, self.bitmap_style).map_err(|err| {
                warn!(%err, "bitmap decode failed");
                Error::Field { number: 1, source: err }
            })?;

        let mut offset = mti_consumed + bitmap_consumed;
        for number in bitmap.iter_fields() {
            let descriptor = self
                .container
                .schema()
                .get(number)
                .ok_or(Error::FieldNotDefined(number))?;
            trace!(field = number, "decoding field");
            let (value, consumed) = field::decode(descriptor, &data[offset..]).map_err(|err| {
                warn!(field = number, %err, "field decode failed");
                Error::wrap_decode(number, err)
            })?;
            self.container.set_unchecked(number, value);
            offset += consumed;
        }

        Ok(offset)
    }
}

fn validate_mti(mti: &str) -> Result<(), Error> {
    if mti.is_empty() {
        return Err(Error::MtiRequired);
    }
    if mti.len() != 4 || !mti.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MtiInvalid);
    }
    Ok(())
}

fn encode_mti(mti: &str, encoding: MtiEncoding) -> Result<Vec<u8>, Error> {
    validate_mti(mti)?;
    Ok(match encoding {
        MtiEncoding::Ascii => mti.as_bytes().to_vec(),
        MtiEncoding::Bcd => crate::bcd::rbcd(mti),
    })
}

pub(crate) fn decode_mti(data: &[u8], encoding: MtiEncoding) -> Result<(String, usize), Error> {
    match encoding {
        MtiEncoding::Ascii => {
            if data.len() < 4 {
                return Err(Error::BadMtiRawData);
            }
            let raw = &data[..4];
            if !raw.iter().all(u8::is_ascii_digit) {
                return Err(Error::BadMtiRawData);
            }
            Ok((String::from_utf8(raw.to_vec()).expect("ascii digits"), 4))
        }
        MtiEncoding::Bcd => {
            if data.len() < 2 {
                return Err(Error::BadMtiRawData);
            }
            let mti = crate::bcd::bcdr_to_ascii(&data[..2], 4).map_err(|_| Error::BadMtiRawData)?;
            Ok((mti, 2))
        }
    }
}
