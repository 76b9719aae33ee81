//! Byte streams consumed by the codec.

use bytes::BytesMut;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised by a [`BinaryStream`]
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("The stream is not open")]
    NotOpen,

    #[error("Cannot read {requested} bytes, only {available} available")]
    Read { requested: usize, available: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// An open-or-closed sequential byte stream
pub trait BinaryStream {
    fn is_open(&self) -> bool;

    /// Read exactly `length` bytes
    ///
    /// On failure nothing is consumed.
    fn read(&mut self, length: usize) -> Result<Vec<u8>, StreamError>;

    /// Read exactly `length` bytes without advancing
    fn peek(&mut self, length: usize) -> Result<Vec<u8>, StreamError>;

    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> Result<(), StreamError>;
}

impl<S: BinaryStream + ?Sized> BinaryStream for &mut S {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        (**self).read(length)
    }

    fn peek(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        (**self).peek(length)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StreamError> {
        (**self).write(data)
    }
}

/// In-memory stream with a cursor
///
/// Writes overwrite bytes at the cursor and grow the buffer past its end.
/// A failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    buffer: BytesMut,
    position: usize,
    open: bool,
}

impl MemoryStream {
    /// Create an open, empty stream
    pub fn new() -> Self {
        Self::with_bytes(&[])
    }

    /// Create an open stream positioned at the start of `data`
    pub fn with_bytes(data: &[u8]) -> Self {
        Self {
            buffer: BytesMut::from(data),
            position: 0,
            open: true,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryStream for MemoryStream {
    fn is_open(&self) -> bool {
        self.open
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        let data = self.peek(length)?;
        self.position += length;
        Ok(data)
    }

    fn peek(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        if !self.open {
            return Err(StreamError::NotOpen);
        }
        let available = self.buffer.len().saturating_sub(self.position);
        if length > available {
            return Err(StreamError::Read {
                requested: length,
                available,
            });
        }
        Ok(self.buffer[self.position..self.position + length].to_vec())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StreamError> {
        if !self.open {
            return Err(StreamError::NotOpen);
        }
        let end = self.position + data.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(data);
        self.position = end;
        Ok(())
    }
}

/// File-backed stream
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
}

impl FileStream {
    /// Create or truncate `path` for reading and writing
    pub fn create(path: &Path) -> Result<Self, StreamError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file: Some(file) })
    }

    /// Open an existing file for reading and writing
    pub fn open(path: &Path) -> Result<Self, StreamError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file: Some(file) })
    }

    /// Flush and release the file
    pub fn close(&mut self) -> Result<(), StreamError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        Ok(())
    }

    fn file(&mut self) -> Result<&mut File, StreamError> {
        self.file.as_mut().ok_or(StreamError::NotOpen)
    }
}

impl BinaryStream for FileStream {
    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        let file = self.file()?;
        let start = file.stream_position()?;
        let mut data = vec![0u8; length];
        if let Err(e) = file.read_exact(&mut data) {
            file.seek(SeekFrom::Start(start))?;
            return Err(e.into());
        }
        Ok(data)
    }

    fn peek(&mut self, length: usize) -> Result<Vec<u8>, StreamError> {
        let file = self.file()?;
        let start = file.stream_position()?;
        let mut data = vec![0u8; length];
        let result = file.read_exact(&mut data);
        file.seek(SeekFrom::Start(start))?;
        result?;
        Ok(data)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.file()?.write_all(data)?;
        Ok(())
    }
}
