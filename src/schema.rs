//! Schema boundary (C7) and value container (C7½).
//!
//! [`Schema`] is the ordered, immutable list of [`FieldDescriptor`]s a
//! template registers under an MTI. [`RawFieldSpec`] and
//! [`FieldDescriptor::from_tags`] are the one place string-shaped metadata
//! (mirroring the original struct-tag reflection) is parsed into typed
//! descriptors — the sole surviving source of [`CriticalError`] outside a
//! malformed registry call. [`FieldContainer`] pairs a `Schema` with the
//! caller's field values.

use std::collections::BTreeMap;

use crate::error::{CriticalError, Error};
use crate::field::{EncoderToken, FieldDescriptor, FieldKind, FieldValue};

/// String-shaped field metadata, as it would arrive from an external
/// schema description (a config file, a struct-tag-derived table, …).
#[derive(Debug, Clone)]
pub struct RawFieldSpec {
    /// Decimal field number tag.
    pub field: String,
    /// Decimal declared-length tag. Absent for variable kinds that rely on
    /// their length-prefix-implied default.
    pub length: Option<String>,
    /// Kind tag (`numeric`, `llvar`, …).
    pub kind: String,
    /// Encoder tag: a single token for fixed kinds, `<content>,<length>`
    /// for variable kinds.
    pub encode: String,
}

impl FieldDescriptor {
    /// Parses one [`RawFieldSpec`] into a [`FieldDescriptor`]. Unrecognized
    /// encoder tokens are stored as-is (spec §4.7): they only fail the
    /// first time a codec tries to resolve them.
    pub fn from_tags(spec: &RawFieldSpec) -> Result<FieldDescriptor, CriticalError> {
        let number: u8 = spec
            .field
            .parse()
            .map_err(|_| CriticalError::FieldNumberNotNumeric)?;
        let kind = FieldKind::parse(&spec.kind).ok_or(CriticalError::FieldMustBeIso8583Type)?;
        let max_length = match &spec.length {
            Some(raw) => Some(raw.parse().map_err(|_| CriticalError::LengthNotNumeric)?),
            None => None,
        };

        let (content, length) = match spec.encode.split_once(',') {
            Some((content, length)) => (content, Some(length)),
            None => (spec.encode.as_str(), None),
        };

        Ok(FieldDescriptor {
            number,
            kind,
            max_length,
            content_encoding: EncoderToken::parse(content),
            length_encoding: length.map(EncoderToken::parse),
        })
    }
}

/// The ordered, immutable set of field descriptors a template registers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    descriptors: Vec<FieldDescriptor>,
}

impl Schema {
    /// Builds a schema directly from already-typed descriptors.
    pub fn new(mut descriptors: Vec<FieldDescriptor>) -> Schema {
        descriptors.sort_by_key(|d| d.number);
        Schema { descriptors }
    }

    /// Builds a schema from raw, string-shaped field metadata (the C7
    /// boundary). An empty list cannot be interpreted as a set of field
    /// descriptors, mirroring handing the original's struct-tag reflection
    /// something that is not a struct.
    pub fn from_raw_fields(specs: &[RawFieldSpec]) -> Result<Schema, CriticalError> {
        if specs.is_empty() {
            return Err(CriticalError::DataMustBeStruct);
        }
        let descriptors = specs
            .iter()
            .map(FieldDescriptor::from_tags)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schema::new(descriptors))
    }

    /// Looks up the descriptor for a field number.
    pub fn get(&self, number: u8) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.number == number)
    }

    /// Iterates descriptors in ascending field-number order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.descriptors.iter()
    }
}

/// Pairs a [`Schema`] with the caller's field values (spec §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContainer {
    schema: Schema,
    values: BTreeMap<u8, FieldValue>,
}

impl FieldContainer {
    /// Builds an empty container over `schema`.
    pub fn new(schema: Schema) -> FieldContainer {
        FieldContainer {
            schema,
            values: BTreeMap::new(),
        }
    }

    /// The container's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Sets field `number`'s value. Fails if the schema has no descriptor
    /// for that number.
    pub fn set(&mut self, number: u8, value: FieldValue) -> Result<(), Error> {
        self.schema
            .get(number)
            .ok_or(Error::FieldNotDefined(number))?;
        self.values.insert(number, value);
        Ok(())
    }

    /// Replaces field `number`'s value in place, without checking the
    /// schema (used by [`crate::message::Message::load`], which has
    /// already validated the bitmap's bits against the schema).
    pub(crate) fn set_unchecked(&mut self, number: u8, value: FieldValue) {
        self.values.insert(number, value);
    }

    /// The current value of field `number`, or `None` if never set.
    pub fn get(&self, number: u8) -> Option<&FieldValue> {
        self.values.get(&number)
    }

    /// Whether field `number` is present (set to a non-empty value).
    pub fn is_present(&self, number: u8) -> bool {
        self.values.get(&number).map(FieldValue::is_present).unwrap_or(false)
    }

    /// Field numbers with a present value, in ascending order.
    pub fn present_fields(&self) -> impl Iterator<Item = u8> + '_ {
        self.values
            .iter()
            .filter(|(_, v)| v.is_present())
            .map(|(&number, _)| number)
    }
}
