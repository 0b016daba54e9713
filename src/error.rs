//! Unified error type for every layer of the codec: byte-stream I/O, the
//! wire codec, the type model, value construction, and schema compilation.
//!
//! Grouping every failure mode into one enum (rather than one type per
//! component, as a protobuf-style codec typically does) mirrors spec §7,
//! which defines a single flat taxonomy shared across layers.

use alloc::string::String;
use core::fmt;

/// Everything that can go wrong while compiling a schema, building a value,
/// or encoding/decoding a value against the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Clean end of stream at a value boundary; not an error for a
    /// streaming reader iterating values one at a time.
    EndOfStream,
    /// End of input reached in the middle of a value.
    TruncatedInput(String),
    /// A varuint did not terminate within 10 bytes.
    MalformedVarint,
    /// The wire type on the stream did not match what the declared type
    /// expects, and primitive-to-composite promotion did not apply.
    UnexpectedWireType(String),
    /// Primitive-to-composite promotion was attempted but the first
    /// subtype of the target composite rejected the incoming wire type.
    Unpromotable(String),
    /// A default value was required but the type provides none.
    NoDefault(String),
    /// A caller-supplied value failed to convert to a declared type.
    TypeMismatch(String),
    /// Reassignment of a non-mutable message field after initialization.
    ImmutableField(String),
    /// A schema referenced a name with no matching declaration.
    UnresolvedName(String),
    /// Catch-all for schema-compile or codec failures not covered above.
    Parse(String),
}

impl Error {
    pub fn truncated(msg: impl Into<String>) -> Self {
        Error::TruncatedInput(msg.into())
    }

    pub fn unexpected_wire_type(msg: impl Into<String>) -> Self {
        Error::UnexpectedWireType(msg.into())
    }

    pub fn unpromotable(msg: impl Into<String>) -> Self {
        Error::Unpromotable(msg.into())
    }

    pub fn no_default(msg: impl Into<String>) -> Self {
        Error::NoDefault(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Error::TypeMismatch(msg.into())
    }

    pub fn immutable_field(msg: impl Into<String>) -> Self {
        Error::ImmutableField(msg.into())
    }

    pub fn unresolved_name(msg: impl Into<String>) -> Self {
        Error::UnresolvedName(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// True for the clean end-of-stream case a streaming reader should not
    /// treat as failure.
    #[must_use]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EndOfStream => write!(f, "end of stream"),
            Error::TruncatedInput(msg) => write!(f, "truncated input: {msg}"),
            Error::MalformedVarint => write!(f, "malformed varint (exceeds 10 bytes)"),
            Error::UnexpectedWireType(msg) => write!(f, "unexpected wire type: {msg}"),
            Error::Unpromotable(msg) => write!(f, "value not promotable: {msg}"),
            Error::NoDefault(msg) => write!(f, "no default value: {msg}"),
            Error::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Error::ImmutableField(msg) => write!(f, "immutable field: {msg}"),
            Error::UnresolvedName(msg) => write!(f, "unresolved name: {msg}"),
            Error::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
