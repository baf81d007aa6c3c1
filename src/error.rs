//! Error taxonomy for the codec.
//!
//! Three tiers, matching the external contract: [`ValidationError`] (caller
//! recoverable, raised by [`crate::field`] codecs before any bytes are
//! touched), [`WireError`] (decode-time, always attached to a field number or
//! to the MTI/bitmap preamble), and [`CriticalError`] (schema-description
//! bugs caught at the [`crate::schema`] loading boundary). [`Error`] is the
//! top-level enum callers match on; its `Display` output reproduces the
//! literal strings downstream log matchers depend on.

/// Caller-recoverable validation failures raised while a field codec is
/// building or consuming bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A fixed or variable kind that requires a declared length has none.
    #[error("missing length")]
    MissingLength,

    /// The resolved content encoder token did not name a known encoder.
    #[error("invalid encoder")]
    InvalidEncoder,

    /// The resolved length-prefix encoder token did not name a known encoder.
    #[error("invalid length encoder")]
    InvalidLengthEncoder,

    /// A variable field's actual length does not fit in its length-prefix
    /// width (2/3/8 ASCII digits, or 1/2 BCD bytes).
    #[error("invalid length head")]
    InvalidLengthHead,

    /// A value exceeds its descriptor's declared maximum length.
    #[error(
        "length of value is longer than definition; type={kind}, def_len={def_len}, len={len}"
    )]
    TooLong {
        /// The field kind whose definition was exceeded.
        kind: crate::field::FieldKind,
        /// The declared maximum length.
        def_len: usize,
        /// The actual value length.
        len: usize,
    },
}

/// Decode-time failures tied to a specific point in the wire format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Not enough bytes remained in the buffer for the requested
    /// conversion, or (by this crate's explicit decision, see DESIGN.md)
    /// a digit-family value contained a non-digit byte.
    #[error("bad raw data")]
    BadRawData,

    /// A variable field's length prefix did not parse as a decimal integer.
    /// Carries the raw prefix bytes rendered as a lossy string.
    #[error("parse length head failed: {0}")]
    ParseLengthHeadFailed(String),

    /// A validation-tier failure surfaced while decoding a field.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Schema-description bugs: the caller's schema itself is malformed. These
/// are the Rust analogue of the original implementation's reflection
/// panics, surfaced here as ordinary, catchable errors instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriticalError {
    /// A raw field-metadata list could not be interpreted as a set of
    /// field descriptors (empty, or otherwise not struct-shaped).
    #[error("data must be a struct")]
    DataMustBeStruct,

    /// A field's `kind` tag did not name a known [`crate::field::FieldKind`].
    #[error("field must be Iso8583Type")]
    FieldMustBeIso8583Type,

    /// A field's `field` (number) tag did not parse as a decimal integer.
    #[error("value of field must be numeric")]
    FieldNumberNotNumeric,

    /// A field's `length` tag did not parse as a decimal integer.
    #[error("value of length must be numeric")]
    LengthNotNumeric,

    /// Any other schema-description failure, carrying its own reason
    /// verbatim (mirrors a caught reflection panic in the original).
    #[error("{0}")]
    Other(String),
}

/// Top-level error type returned by [`crate::message::Message`],
/// [`crate::template::TemplateRegistry`], and the [`crate::schema`]
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The MTI was empty.
    #[error("MTI is required")]
    MtiRequired,

    /// The MTI was not exactly four decimal digits.
    #[error("MTI is invalid")]
    MtiInvalid,

    /// A validation-tier error that bubbles up unwrapped from a field codec
    /// at encode time (missing length / invalid encoder / too-long value),
    /// per spec §4.5 point 3.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A wire-tier error attached to a specific field number.
    #[error("field {number}: {source}")]
    Field {
        /// The 1-based field number the error occurred on.
        number: u8,
        /// The underlying wire-tier failure.
        #[source]
        source: WireError,
    },

    /// A bit was set in the bitmap for which the schema has no descriptor.
    #[error("field {0} not defined")]
    FieldNotDefined(u8),

    /// The MTI bytes were truncated or otherwise malformed.
    #[error("bad MTI raw data")]
    BadMtiRawData,

    /// No schema is registered for the decoded MTI.
    #[error("no template registered for MTI: {0}")]
    TemplateNotRegistered(String),

    /// The registry's configured `mti_encoding` was not recognized.
    #[error("invalid encode type")]
    InvalidEncodeType,

    /// A schema-description bug, surfaced verbatim with the `Critical
    /// error:` prefix.
    #[error("Critical error: {0}")]
    Critical(#[from] CriticalError),
}

impl Error {
    /// Wraps a field codec error the way `Message::to_bytes` does: the
    /// three initial descriptor-validation failures bubble up unwrapped,
    /// everything else (including a malformed *value*, e.g. non-digit
    /// Numeric content, which surfaces as `WireError::BadRawData`) gets
    /// the `field <N>: ` prefix.
    pub(crate) fn wrap_encode(number: u8, err: WireError) -> Error {
        match err {
            WireError::Validation(
                inner @ (ValidationError::MissingLength
                | ValidationError::InvalidEncoder
                | ValidationError::TooLong { .. }),
            ) => Error::Validation(inner),
            other => Error::Field {
                number,
                source: other,
            },
        }
    }

    /// Wraps a field codec error the way `Message::load` does: every
    /// per-field failure gets the `field <N>: ` prefix, no exceptions.
    pub(crate) fn wrap_decode(number: u8, err: WireError) -> Error {
        Error::Field {
            number,
            source: err,
        }
    }
}

/// Renders raw bytes the way `parse length head failed: <literal bytes>`
/// expects: a lossy UTF-8 view, since the prefix is nominally ASCII digits.
pub(crate) fn literal_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
