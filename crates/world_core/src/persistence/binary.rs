//! Binary persistence stream
//!
//! Values are written untagged, the way a file stream dumps them: the
//! reader must request the same kinds in the same order. Scalars and
//! vectors are stored as raw native-endian bytes; strings carry a `u32`
//! byte-length prefix.

use std::io::{self, Read, Write};

use bytemuck::Pod;

use crate::ecs::attribute::{AttributeKind, AttributeValue};
use crate::foundation::math::{quat_from_array, quat_to_array, Vec3, Vec4};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Writes values to any [`Write`]
#[derive(Debug)]
pub struct BinaryWriter<W: Write> {
    writer: W,
    bytes_written: usize,
}

impl<W: Write> BinaryWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer, bytes_written: 0 }
    }

    /// Total bytes written
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W, PersistenceError> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_pod<T: Pod>(&mut self, value: &T) -> Result<(), PersistenceError> {
        let bytes = bytemuck::bytes_of(value);
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }
}

impl<W: Write> PersistenceSink for BinaryWriter<W> {
    fn write(&mut self, value: AttributeValue) -> Result<(), PersistenceError> {
        match value {
            AttributeValue::Bool(v) => self.write_pod(&u8::from(v)),
            AttributeValue::I32(v) => self.write_pod(&v),
            AttributeValue::U32(v) => self.write_pod(&v),
            AttributeValue::U64(v) => self.write_pod(&v),
            AttributeValue::F32(v) => self.write_pod(&v),
            AttributeValue::Vec3(v) => self.write_pod(&[v.x, v.y, v.z]),
            AttributeValue::Vec4(v) => self.write_pod(&[v.x, v.y, v.z, v.w]),
            AttributeValue::Quat(q) => self.write_pod(&quat_to_array(&q)),
            AttributeValue::String(s) => {
                let len = u32::try_from(s.len())
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string longer than u32::MAX bytes"))?;
                self.write_pod(&len)?;
                self.writer.write_all(s.as_bytes())?;
                self.bytes_written += s.len();
                Ok(())
            }
        }
    }
}

/// Reads values from any [`Read`]
#[derive(Debug)]
pub struct BinaryReader<R: Read> {
    reader: R,
}

impl<R: Read> BinaryReader<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), PersistenceError> {
        self.reader.read_exact(buffer).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => PersistenceError::UnexpectedEnd,
            _ => PersistenceError::Io(e),
        })
    }

    fn read_pod<T: Pod>(&mut self) -> Result<T, PersistenceError> {
        let mut value = T::zeroed();
        self.read_exact(bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }
}

impl<R: Read> PersistenceSource for BinaryReader<R> {
    fn read(&mut self, kind: AttributeKind) -> Result<AttributeValue, PersistenceError> {
        let value = match kind {
            AttributeKind::Bool => AttributeValue::Bool(self.read_pod::<u8>()? != 0),
            AttributeKind::I32 => AttributeValue::I32(self.read_pod()?),
            AttributeKind::U32 => AttributeValue::U32(self.read_pod()?),
            AttributeKind::U64 => AttributeValue::U64(self.read_pod()?),
            AttributeKind::F32 => AttributeValue::F32(self.read_pod()?),
            AttributeKind::Vec3 => {
                let [x, y, z] = self.read_pod::<[f32; 3]>()?;
                AttributeValue::Vec3(Vec3::new(x, y, z))
            }
            AttributeKind::Vec4 => {
                let [x, y, z, w] = self.read_pod::<[f32; 4]>()?;
                AttributeValue::Vec4(Vec4::new(x, y, z, w))
            }
            AttributeKind::Quat => AttributeValue::Quat(quat_from_array(self.read_pod()?)),
            AttributeKind::String => {
                let len = self.read_pod::<u32>()? as usize;
                let mut bytes = vec![0; len];
                self.read_exact(&mut bytes)?;
                AttributeValue::String(String::from_utf8(bytes)?)
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;

    #[test]
    fn test_mixed_values_roundtrip() {
        let values = vec![
            AttributeValue::Bool(true),
            AttributeValue::I32(-4),
            AttributeValue::U64(1 << 40),
            AttributeValue::Vec3(Vec3::new(1.0, -2.0, 3.5)),
            AttributeValue::String("meshes/crate.obj".into()),
            AttributeValue::Vec4(Vec4::new(0.1, 0.2, 0.3, 1.0)),
        ];

        let mut writer = BinaryWriter::new(Vec::new());
        for value in &values {
            writer.write(value.clone()).unwrap();
        }
        assert_eq!(writer.bytes_written(), 1 + 4 + 8 + 12 + 4 + 16 + 16);
        let bytes = writer.into_inner().unwrap();

        let mut reader = BinaryReader::new(bytes.as_slice());
        for value in &values {
            assert_eq!(&reader.read(value.kind()).unwrap(), value);
        }
    }

    #[test]
    fn test_quat_survives_encoding() {
        let q = Quat::from_euler_angles(0.1, 0.2, 0.3);
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write(AttributeValue::Quat(q)).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = BinaryReader::new(bytes.as_slice());
        match reader.read(AttributeKind::Quat).unwrap() {
            AttributeValue::Quat(back) => approx::assert_relative_eq!(q.coords, back.coords, epsilon = 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_truncated_stream_is_unexpected_end() {
        let mut reader = BinaryReader::new(&[1u8, 2][..]);
        assert!(matches!(reader.read_u32(), Err(PersistenceError::UnexpectedEnd)));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(bytemuck::bytes_of(&2u32));
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let mut reader = BinaryReader::new(bytes.as_slice());
        assert!(matches!(reader.read_string(), Err(PersistenceError::InvalidString(_))));
    }
}
