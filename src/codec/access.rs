//! Typed primitive access over a [`BinaryStream`].

use crate::codec::error::{CodecError, CodecResult, Datatype, Direction};
use crate::codec::{BinaryStream, StreamError};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::{trace, warn};

/// Longest string or binary payload the length prefix can describe
pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

/// Reads and writes primitives sequentially on an open stream
///
/// Multi-byte values are little-endian. Strings and binary data carry a
/// 2-byte length prefix.
#[derive(Debug)]
pub struct BinaryStreamAccess<S> {
    stream: S,
}

impl<S: BinaryStream> BinaryStreamAccess<S> {
    /// Wrap `stream`, which must already be open
    ///
    /// No primitive is involved yet, so a closed stream is reported as the
    /// stream's own [`StreamError::NotOpen`].
    pub fn new(stream: S) -> Result<Self, StreamError> {
        if !stream.is_open() {
            warn!("Refusing to access a closed binary stream");
            return Err(StreamError::NotOpen);
        }
        Ok(Self { stream })
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn read_bytes(&mut self, datatype: Datatype, length: usize) -> CodecResult<Vec<u8>> {
        self.stream.read(length).map_err(|e| {
            warn!("Failed reading {} byte(s) of a {}: {}", length, datatype, e);
            CodecError::from_stream(datatype, Direction::Read, e)
        })
    }

    fn peek_bytes(&mut self, datatype: Datatype, length: usize) -> CodecResult<Vec<u8>> {
        self.stream.peek(length).map_err(|e| {
            warn!("Failed reading {} byte(s) of a {}: {}", length, datatype, e);
            CodecError::from_stream(datatype, Direction::Read, e)
        })
    }

    fn read_fixed<const N: usize>(&mut self, datatype: Datatype) -> CodecResult<[u8; N]> {
        let bytes = self.read_bytes(datatype, N)?;
        let available = bytes.len();
        bytes.try_into().map_err(|_| {
            CodecError::from_stream(
                datatype,
                Direction::Read,
                StreamError::Read {
                    requested: N,
                    available,
                },
            )
        })
    }

    fn write_bytes(&mut self, datatype: Datatype, data: &[u8]) -> CodecResult<()> {
        self.stream.write(data).map_err(|e| {
            warn!("Failed writing {} byte(s) of a {}: {}", data.len(), datatype, e);
            CodecError::from_stream(datatype, Direction::Write, e)
        })
    }

    /// Encode into a scratch buffer, then hand it to the stream in one write
    fn write_encoded<F>(&mut self, datatype: Datatype, encode: F) -> CodecResult<()>
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        encode(&mut buf)
            .map_err(|e| CodecError::from_stream(datatype, Direction::Write, StreamError::Io(e)))?;
        self.write_bytes(datatype, &buf)
    }

    pub fn read_tiny_int(&mut self) -> CodecResult<u8> {
        let [value] = self.read_fixed::<1>(Datatype::TinyInt)?;
        trace!("read tiny integer {}", value);
        Ok(value)
    }

    pub fn write_tiny_int(&mut self, value: u8) -> CodecResult<()> {
        trace!("write tiny integer {}", value);
        self.write_bytes(Datatype::TinyInt, &[value])
    }

    pub fn read_short(&mut self) -> CodecResult<u16> {
        let bytes = self.read_fixed::<2>(Datatype::Short)?;
        let value = LittleEndian::read_u16(&bytes);
        trace!("read short integer {}", value);
        Ok(value)
    }

    pub fn write_short(&mut self, value: u16) -> CodecResult<()> {
        trace!("write short integer {}", value);
        self.write_encoded(Datatype::Short, |buf| buf.write_u16::<LittleEndian>(value))
    }

    pub fn read_int(&mut self) -> CodecResult<i32> {
        let bytes = self.read_fixed::<4>(Datatype::Int)?;
        let value = LittleEndian::read_i32(&bytes);
        trace!("read integer {}", value);
        Ok(value)
    }

    pub fn write_int(&mut self, value: i32) -> CodecResult<()> {
        trace!("write integer {}", value);
        self.write_encoded(Datatype::Int, |buf| buf.write_i32::<LittleEndian>(value))
    }

    pub fn read_float(&mut self) -> CodecResult<f64> {
        let bytes = self.read_fixed::<8>(Datatype::Float)?;
        let value = LittleEndian::read_f64(&bytes);
        trace!("read double precision float {}", value);
        Ok(value)
    }

    pub fn write_float(&mut self, value: f64) -> CodecResult<()> {
        trace!("write double precision float {}", value);
        self.write_encoded(Datatype::Float, |buf| buf.write_f64::<LittleEndian>(value))
    }

    /// Read one byte; any nonzero byte is true
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        let [byte] = self.read_fixed::<1>(Datatype::Bool)?;
        trace!("read boolean byte {}", byte);
        Ok(byte != 0)
    }

    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        trace!("write boolean {}", value);
        self.write_bytes(Datatype::Bool, &[u8::from(value)])
    }

    /// Decode a length-prefixed payload, consuming it only once `decode` succeeds
    fn read_payload<T, F>(&mut self, datatype: Datatype, decode: F) -> CodecResult<T>
    where
        F: FnOnce(Vec<u8>) -> CodecResult<T>,
    {
        let prefix = self.peek_bytes(datatype, 2)?;
        let length = 2 + usize::from(LittleEndian::read_u16(&prefix));
        let mut framed = self.peek_bytes(datatype, length)?;
        let value = decode(framed.split_off(2))?;
        self.read_bytes(datatype, length)?;
        Ok(value)
    }

    fn write_payload(&mut self, datatype: Datatype, data: &[u8]) -> CodecResult<()> {
        let length = u16::try_from(data.len()).map_err(|_| {
            warn!("A {} of {} bytes cannot be length-prefixed", datatype, data.len());
            CodecError::OutOfRange {
                datatype,
                direction: Direction::Write,
                length: data.len(),
                max: MAX_STRING_LENGTH,
            }
        })?;
        self.write_encoded(datatype, |buf| {
            buf.write_u16::<LittleEndian>(length)?;
            buf.extend_from_slice(data);
            Ok(())
        })
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        let value = self.read_payload(Datatype::String, |payload| {
            String::from_utf8(payload).map_err(|source| {
                warn!("String payload is not valid UTF-8: {}", source);
                CodecError::Malformed {
                    datatype: Datatype::String,
                    direction: Direction::Read,
                    source,
                }
            })
        })?;
        trace!("read string of {} bytes", value.len());
        Ok(value)
    }

    /// Write a length-prefixed string; longer than 65535 bytes is rejected
    /// without writing anything
    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        trace!("write string of {} bytes", value.len());
        self.write_payload(Datatype::String, value.as_bytes())
    }

    pub fn read_binary(&mut self) -> CodecResult<Vec<u8>> {
        let payload = self.read_payload(Datatype::Binary, Ok)?;
        trace!("read {} bytes of binary data", payload.len());
        Ok(payload)
    }

    pub fn write_binary(&mut self, value: &[u8]) -> CodecResult<()> {
        trace!("write {} bytes of binary data", value.len());
        self.write_payload(Datatype::Binary, value)
    }
}
