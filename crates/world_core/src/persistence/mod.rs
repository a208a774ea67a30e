//! Persistence adapter
//!
//! An ordered sink/source of [`AttributeValue`]s. The runtime writes values
//! in a fixed order (entity header, then each component's attributes in
//! registration order) and reads them back in the same order; the adapter
//! knows nothing about component semantics.
//!
//! Implementations:
//! - [`MemoryStream`] - tagged in-memory queue
//! - [`BinaryWriter`] / [`BinaryReader`] - untagged byte stream over `std::io`
//! - [`SceneDocument`] - RON scene snapshot

pub mod binary;
pub mod memory;
pub mod scene;

pub use binary::{BinaryReader, BinaryWriter};
pub use memory::MemoryStream;
pub use scene::{ComponentRecord, EntityRecord, SceneDocument};

use crate::ecs::attribute::{AttributeKind, AttributeType, AttributeValue};

/// Persistence errors
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ran out of values
    #[error("unexpected end of stream")]
    UnexpectedEnd,

    /// The next stored value is not of the requested kind
    #[error("expected {expected} value, found {found}")]
    KindMismatch {
        /// Requested kind
        expected: AttributeKind,
        /// Stored kind
        found: AttributeKind,
    },

    /// A component tag that does not name a known component type
    #[error("unknown component type tag {0}")]
    UnknownComponentType(u32),

    /// String payload is not valid UTF-8
    #[error("invalid string data: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),

    /// RON scene encoding or decoding failure
    #[error("scene format error: {0}")]
    Ron(String),
}

/// Append-only value sink
pub trait PersistenceSink {
    /// Append one value
    fn write(&mut self, value: AttributeValue) -> Result<(), PersistenceError>;

    /// Append a boolean
    fn write_bool(&mut self, value: bool) -> Result<(), PersistenceError> {
        self.write(AttributeValue::Bool(value))
    }

    /// Append an unsigned integer
    fn write_u32(&mut self, value: u32) -> Result<(), PersistenceError> {
        self.write(AttributeValue::U32(value))
    }

    /// Append a wide unsigned integer
    fn write_u64(&mut self, value: u64) -> Result<(), PersistenceError> {
        self.write(AttributeValue::U64(value))
    }

    /// Append a string
    fn write_string(&mut self, value: &str) -> Result<(), PersistenceError> {
        self.write(AttributeValue::String(value.to_owned()))
    }
}

/// Ordered value source
pub trait PersistenceSource {
    /// Read the next value, which must be of `kind`
    fn read(&mut self, kind: AttributeKind) -> Result<AttributeValue, PersistenceError>;

    /// Read a boolean
    fn read_bool(&mut self) -> Result<bool, PersistenceError> {
        unwrap_kind(self.read(AttributeKind::Bool)?)
    }

    /// Read an unsigned integer
    fn read_u32(&mut self) -> Result<u32, PersistenceError> {
        unwrap_kind(self.read(AttributeKind::U32)?)
    }

    /// Read a wide unsigned integer
    fn read_u64(&mut self) -> Result<u64, PersistenceError> {
        unwrap_kind(self.read(AttributeKind::U64)?)
    }

    /// Read a string
    fn read_string(&mut self) -> Result<String, PersistenceError> {
        unwrap_kind(self.read(AttributeKind::String)?)
    }
}

fn unwrap_kind<T: AttributeType>(value: AttributeValue) -> Result<T, PersistenceError> {
    T::from_value(value).map_err(|found| PersistenceError::KindMismatch {
        expected: T::KIND,
        found: found.kind(),
    })
}
