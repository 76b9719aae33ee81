//! Binary value codec.
//!
//! This module provides:
//!
//! - **BinaryStream**: the open/read/write contract of a byte stream, with
//!   in-memory and file-backed implementations
//! - **BinaryStreamAccess**: sequential encoding and decoding of primitives
//! - **CodecError**: failures tagged with datatype, direction and cause
//!
//! Wire format, all multi-byte values little-endian:
//!
//! | datatype      | encoding                                   |
//! |---------------|--------------------------------------------|
//! | tiny integer  | 1 byte, unsigned                           |
//! | short integer | 2 bytes, unsigned                          |
//! | integer       | 4 bytes, two's complement                  |
//! | float         | 8 bytes, IEEE-754 double                   |
//! | boolean       | 1 byte, 1 for true, any nonzero reads true |
//! | string/binary | 2-byte length, then the raw bytes          |

pub mod access;
pub mod error;
pub mod stream;

pub use access::{BinaryStreamAccess, MAX_STRING_LENGTH};
pub use error::{Cause, CodecError, CodecResult, Datatype, Direction};
pub use stream::{BinaryStream, FileStream, MemoryStream, StreamError};
