//! Template registry (C6): maps an MTI to a schema prototype so inbound
//! bytes can be parsed without out-of-band configuration.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::bitmap::BitmapStyle;
use crate::error::{CriticalError, Error};
use crate::message::{decode_mti, Message, MtiEncoding};
use crate::schema::Schema;

/// A read-mostly MTI → [`Schema`] mapping. `register`/`deregister` take the
/// write side of an internal [`RwLock`]; concurrent `parse` calls proceed
/// without blocking each other.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Schema>>,
    mti_encoding: String,
    bitmap_style: BitmapStyle,
}

impl TemplateRegistry {
    /// Builds a registry with the default `mti_encoding` (`"ascii"`).
    pub fn new(bitmap_style: BitmapStyle) -> TemplateRegistry {
        TemplateRegistry::with_mti_encoding(bitmap_style, "ascii")
    }

    /// Builds a registry with an explicit `mti_encoding` token. Unlike a
    /// field's encoder token, this is not resolved until the first
    /// [`TemplateRegistry::parse`] call, consistent with the rest of this
    /// crate's lazy token resolution.
    pub fn with_mti_encoding(bitmap_style: BitmapStyle, mti_encoding: impl Into<String>) -> TemplateRegistry {
        TemplateRegistry {
            templates: RwLock::new(HashMap::new()),
            mti_encoding: mti_encoding.into(),
            bitmap_style,
        }
    }

    /// Registers `schema` as the prototype for `mti`. Rejects a malformed
    /// MTI, an empty ("nil") prototype, and re-registration of an MTI that
    /// is already present — callers must [`TemplateRegistry::deregister`]
    /// first.
    pub fn register(&self, mti: &str, schema: Schema) -> Result<(), Error> {
        if mti.len() != 4 || !mti.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MtiInvalid);
        }
        if schema.iter().next().is_none() {
            return Err(Error::Critical(CriticalError::Other(
                "nil prototype".to_string(),
            )));
        }
        let mut templates = self.templates.write().expect("template registry lock poisoned");
        if templates.contains_key(mti) {
            return Err(Error::Critical(CriticalError::Other(format!(
                "template already registered for MTI: {mti}"
            ))));
        }
        templates.insert(mti.to_string(), schema);
        Ok(())
    }

    /// Removes a registered prototype, if any. Returns whether one was
    /// present.
    pub fn deregister(&self, mti: &str) -> bool {
        self.templates
            .write()
            .expect("template registry lock poisoned")
            .remove(mti)
            .is_some()
    }

    /// Reads the MTI from `raw` (respecting this registry's configured
    /// `mti_encoding`), looks up the matching prototype, and decodes the
    /// rest of the message against a clone of it.
    pub fn parse(&self, raw: &[u8]) -> Result<Message, Error> {
        let mti_encoding = self.resolve_mti_encoding()?;
        let (mti, _) = decode_mti(raw, mti_encoding)?;

        let schema = {
            let templates = self.templates.read().expect("template registry lock poisoned");
            templates.get(&mti).cloned()
        };
        let schema = schema.ok_or_else(|| {
            warn!(%mti, "no template registered");
            Error::TemplateNotRegistered(mti.clone())
        })?;

        debug!(%mti, "parsing message against registered template");
        let mut message = Message::new(mti, schema, mti_encoding, self.bitmap_style, false);
        message.load(raw)?;
        Ok(message)
    }

    fn resolve_mti_encoding(&self) -> Result<MtiEncoding, Error> {
        match self.mti_encoding.as_str() {
            "ascii" => Ok(MtiEncoding::Ascii),
            "bcd" => Ok(MtiEncoding::Bcd),
            _ => Err(Error::InvalidEncodeType),
        }
    }
}
