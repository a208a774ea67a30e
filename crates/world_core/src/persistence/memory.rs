//! In-memory persistence stream

use crate::ecs::attribute::{AttributeKind, AttributeValue};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Tagged in-memory value queue usable as both sink and source
///
/// Values keep their variant, so reading with the wrong kind is detected
/// and reported instead of being reinterpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStream {
    values: Vec<AttributeValue>,
    cursor: usize,
}

impl MemoryStream {
    /// Empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream that reads back `values` from the start
    pub fn from_values(values: Vec<AttributeValue>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Everything written so far
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// Consume the stream, returning its values
    pub fn into_values(self) -> Vec<AttributeValue> {
        self.values
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was written
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values not yet read
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    /// Restart reading from the first value
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl PersistenceSink for MemoryStream {
    fn write(&mut self, value: AttributeValue) -> Result<(), PersistenceError> {
        self.values.push(value);
        Ok(())
    }
}

impl PersistenceSource for MemoryStream {
    fn read(&mut self, kind: AttributeKind) -> Result<AttributeValue, PersistenceError> {
        let value = self.values.get(self.cursor).ok_or(PersistenceError::UnexpectedEnd)?;
        if value.kind() != kind {
            return Err(PersistenceError::KindMismatch { expected: kind, found: value.kind() });
        }
        self.cursor += 1;
        Ok(value.clone())
    }
}
